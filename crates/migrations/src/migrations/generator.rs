//! Migration Generator - turns a live table into a definition artifact
//!
//! Introspects a table's columns and indexes, wraps them into a versioned
//! `MigrationDefinition`, and persists it through the store. Structure
//! only; row data never enters a definition.

use chrono::Utc;

use crate::backends::DatabaseAdapter;
use crate::error::MigrationResult;
use crate::introspect::SchemaIntrospector;
use crate::migrations::definitions::{MigrationConfig, MigrationDefinition};
use crate::migrations::store::MigrationStore;
use crate::schema::TableDefinition;

/// Generates migration definitions from a live schema
pub struct MigrationGenerator<'a> {
    adapter: &'a dyn DatabaseAdapter,
    config: &'a MigrationConfig,
}

impl<'a> MigrationGenerator<'a> {
    pub fn new(adapter: &'a dyn DatabaseAdapter, config: &'a MigrationConfig) -> Self {
        Self { adapter, config }
    }

    /// Generate and persist a definition for one table
    ///
    /// Safe against tables with zero rows. Fails with `TableNotFound` when
    /// the table does not exist. Generating the same table within one
    /// timestamp second overwrites the previous artifact.
    pub async fn generate(&self, table: &str) -> MigrationResult<MigrationDefinition> {
        let introspector = SchemaIntrospector::new(self.adapter);
        let columns = introspector.describe_columns(table).await?;
        let indexes = introspector.describe_indexes(table).await?;

        let definition = MigrationDefinition {
            version: format!("{}_{}", Utc::now().format("%Y%m%d%H%M%S"), table),
            table: TableDefinition {
                name: table.to_string(),
                columns,
                indexes,
                options: Default::default(),
            },
            generated_at: Utc::now(),
        };

        let store = MigrationStore::new(&self.config.migrations_dir);
        let path = store.save(&definition)?;
        tracing::info!(
            table = %table,
            version = %definition.version,
            path = %path.display(),
            "generated migration definition"
        );

        Ok(definition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::MemoryDatabase;
    use crate::schema::{Column, ColumnType, IndexDefinition};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_generate_persists_introspected_schema() {
        let db = MemoryDatabase::new();
        db.create_table(
            &TableDefinition::new("accounts")
                .column(
                    Column::new("id", ColumnType::BigInteger)
                        .primary(true)
                        .auto_increment(true),
                )
                .column(Column::new("email", ColumnType::Varchar).size(255))
                .index(IndexDefinition::new("idx_email", vec!["email".into()]).unique(true)),
        )
        .await
        .unwrap();

        let temp_dir = TempDir::new().unwrap();
        let config = MigrationConfig {
            migrations_dir: temp_dir.path().to_path_buf(),
            ..Default::default()
        };

        let definition = MigrationGenerator::new(&db, &config)
            .generate("accounts")
            .await
            .unwrap();
        assert!(definition.version.ends_with("_accounts"));
        assert_eq!(definition.table.columns.len(), 2);
        assert!(definition.table.columns[0].auto_increment);
        assert_eq!(definition.table.indexes.len(), 1);

        // The artifact is on disk and loads back identically.
        let loaded = MigrationStore::new(temp_dir.path()).load_all().unwrap();
        assert_eq!(loaded, vec![definition]);
    }

    #[tokio::test]
    async fn test_generate_missing_table_fails() {
        let db = MemoryDatabase::new();
        let temp_dir = TempDir::new().unwrap();
        let config = MigrationConfig {
            migrations_dir: temp_dir.path().to_path_buf(),
            ..Default::default()
        };

        assert!(MigrationGenerator::new(&db, &config)
            .generate("absent")
            .await
            .is_err());
    }
}
