//! Schema Introspection
//!
//! Reads a live table's column and index metadata through an adapter and
//! maps it back into the logical metamodel via the dialect's inverse
//! mapping. Read-only; fails with `TableNotFound` when the table is absent.

use crate::backends::DatabaseAdapter;
use crate::error::{MigrationError, MigrationResult};
use crate::schema::{Column, IndexDefinition};

/// Maps engine-reported schema metadata back to logical definitions
pub struct SchemaIntrospector<'a> {
    adapter: &'a dyn DatabaseAdapter,
}

impl<'a> SchemaIntrospector<'a> {
    pub fn new(adapter: &'a dyn DatabaseAdapter) -> Self {
        Self { adapter }
    }

    /// Logical columns for a table, in the engine's reported physical order
    pub async fn describe_columns(&self, table: &str) -> MigrationResult<Vec<Column>> {
        if !self.adapter.table_exists(table).await? {
            return Err(MigrationError::TableNotFound {
                table: table.to_string(),
            });
        }

        let dialect = self.adapter.dialect();
        self.adapter
            .describe_columns(table)
            .await?
            .iter()
            .map(|meta| dialect.column_from_metadata(meta))
            .collect()
    }

    /// Secondary indexes for a table
    ///
    /// The primary key is not reported here; it is carried by the column
    /// flags instead.
    pub async fn describe_indexes(&self, table: &str) -> MigrationResult<Vec<IndexDefinition>> {
        if !self.adapter.table_exists(table).await? {
            return Err(MigrationError::TableNotFound {
                table: table.to_string(),
            });
        }

        Ok(self
            .adapter
            .describe_indexes(table)
            .await?
            .into_iter()
            .filter(|index| index.name != "PRIMARY")
            .map(|index| IndexDefinition {
                name: index.name,
                columns: index.columns,
                unique: index.unique,
            })
            .collect())
    }
}
