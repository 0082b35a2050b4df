//! Table definitions: ordered columns, indexes, and opaque create-options

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{MigrationError, MigrationResult};
use crate::schema::Column;

/// A secondary index over one or more columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDefinition {
    pub name: String,
    pub columns: Vec<String>,
    #[serde(default)]
    pub unique: bool,
}

impl IndexDefinition {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            unique: false,
        }
    }

    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }
}

/// Logical description of one table: name, ordered columns, optional
/// indexes, and opaque create-options (storage engine, charset, ...)
/// passed through to the dialect untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDefinition {
    pub name: String,
    pub columns: Vec<Column>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indexes: Vec<IndexDefinition>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, String>,
}

impl TableDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            indexes: Vec::new(),
            options: BTreeMap::new(),
        }
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn index(mut self, index: IndexDefinition) -> Self {
        self.indexes.push(index);
        self
    }

    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn column_named(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Columns participating in the primary key, in definition order
    pub fn primary_columns(&self) -> Vec<&Column> {
        self.columns.iter().filter(|c| c.primary).collect()
    }

    /// Validate every column plus the table-level invariants: unique column
    /// names and at most one auto-increment column.
    pub fn validate(&self) -> MigrationResult<()> {
        let mut seen = HashSet::new();
        let mut auto_increment_count = 0;

        for column in &self.columns {
            column.validate()?;
            if !seen.insert(column.name.as_str()) {
                return Err(MigrationError::InvalidColumnDefinition {
                    column: column.name.clone(),
                    message: format!("duplicate column name in table '{}'", self.name),
                });
            }
            if column.auto_increment {
                auto_increment_count += 1;
            }
        }

        if auto_increment_count > 1 {
            return Err(MigrationError::InvalidColumnDefinition {
                column: self.name.clone(),
                message: "a table can have at most one auto-increment column".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnType;

    #[test]
    fn test_duplicate_column_names_rejected() {
        let table = TableDefinition::new("users")
            .column(Column::new("id", ColumnType::Integer))
            .column(Column::new("id", ColumnType::BigInteger));
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_single_auto_increment_allowed() {
        let table = TableDefinition::new("users")
            .column(
                Column::new("id", ColumnType::Integer)
                    .primary(true)
                    .auto_increment(true),
            )
            .column(Column::new("age", ColumnType::TinyInteger));
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_multiple_auto_increment_rejected() {
        let table = TableDefinition::new("users")
            .column(
                Column::new("id", ColumnType::Integer)
                    .primary(true)
                    .auto_increment(true),
            )
            .column(
                Column::new("seq", ColumnType::BigInteger)
                    .primary(true)
                    .auto_increment(true),
            );
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_primary_columns_in_definition_order() {
        let table = TableDefinition::new("t")
            .column(Column::new("a", ColumnType::Integer).primary(true))
            .column(Column::new("b", ColumnType::Integer))
            .column(Column::new("c", ColumnType::Integer).primary(true));
        let primary: Vec<&str> = table
            .primary_columns()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(primary, vec!["a", "c"]);
    }
}
