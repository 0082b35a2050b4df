//! Core Database Adapter Traits
//!
//! This module defines the trait the migration core uses to talk to a
//! database engine, plus the metadata and value types that cross that
//! boundary. Adapters are intentionally structural: tables are created from
//! [`TableDefinition`]s and columns are added from [`Column`]s, so an
//! adapter can build engine-specific DDL through its dialect without the
//! core ever parsing SQL.

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::dialect::Dialect;
use crate::error::MigrationResult;
use crate::schema::{Column, TableDefinition};

/// Column metadata as reported by an engine's schema catalog
///
/// `column_type` is the full native type string (e.g. `mediumint(9) unsigned`
/// or `enum('Y','N','D','')`); the dialect's inverse mapping parses it back
/// into a logical [`Column`].
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMetadata {
    pub name: String,
    pub column_type: String,
    pub nullable: bool,
    pub primary: bool,
    pub auto_increment: bool,
}

/// Index metadata as reported by an engine's schema catalog
#[derive(Debug, Clone, PartialEq)]
pub struct IndexMetadata {
    pub name: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

/// Abstract database adapter trait
///
/// One adapter instance is bound to one schema (database). All operations
/// are read-only except the DDL and row operations named as such.
#[async_trait]
pub trait DatabaseAdapter: Send + Sync {
    /// The dialect this adapter maps logical columns through
    fn dialect(&self) -> &dyn Dialect;

    /// Execute a raw DDL statement
    ///
    /// Structural adapters that do not consume SQL (e.g. the in-memory
    /// engine) return an error here; the migration core only uses the
    /// structural operations below.
    async fn execute_ddl(&self, statement: &str) -> MigrationResult<()>;

    /// Create a table from a logical definition
    async fn create_table(&self, definition: &TableDefinition) -> MigrationResult<()>;

    /// Add a single column to an existing table, optionally placed after a
    /// named column (or first, per the column's placement hint)
    async fn add_column(
        &self,
        table: &str,
        column: &Column,
        after: Option<&str>,
    ) -> MigrationResult<()>;

    /// Drop a table if it exists
    async fn drop_table(&self, table: &str) -> MigrationResult<()>;

    /// Whether a table exists in the bound schema
    async fn table_exists(&self, table: &str) -> MigrationResult<bool>;

    /// Column metadata in the engine's reported physical order
    async fn describe_columns(&self, table: &str) -> MigrationResult<Vec<ColumnMetadata>>;

    /// Index metadata for a table
    async fn describe_indexes(&self, table: &str) -> MigrationResult<Vec<IndexMetadata>>;

    /// Insert one row, providing values for the named columns
    async fn insert_row(
        &self,
        table: &str,
        values: &[DatabaseValue],
        columns: &[&str],
    ) -> MigrationResult<()>;

    /// All values of one column, in insertion order
    async fn fetch_column(&self, table: &str, column: &str) -> MigrationResult<Vec<DatabaseValue>>;
}

/// Database value enumeration for type-safe row data
///
/// Decimals travel as strings so boundary values like `12345678.12` survive
/// without floating-point loss.
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseValue {
    Null,
    Bool(bool),
    Int64(i64),
    UInt64(u64),
    Float64(f64),
    Decimal(String),
    String(String),
    Time(chrono::NaiveTime),
    Json(JsonValue),
}

impl DatabaseValue {
    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, DatabaseValue::Null)
    }

    /// Short type label used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            DatabaseValue::Null => "null",
            DatabaseValue::Bool(_) => "bool",
            DatabaseValue::Int64(_) => "integer",
            DatabaseValue::UInt64(_) => "unsigned integer",
            DatabaseValue::Float64(_) => "float",
            DatabaseValue::Decimal(_) => "decimal",
            DatabaseValue::String(_) => "string",
            DatabaseValue::Time(_) => "time",
            DatabaseValue::Json(_) => "json",
        }
    }
}

impl From<bool> for DatabaseValue {
    fn from(value: bool) -> Self {
        DatabaseValue::Bool(value)
    }
}

impl From<i32> for DatabaseValue {
    fn from(value: i32) -> Self {
        DatabaseValue::Int64(value as i64)
    }
}

impl From<i64> for DatabaseValue {
    fn from(value: i64) -> Self {
        DatabaseValue::Int64(value)
    }
}

impl From<u64> for DatabaseValue {
    fn from(value: u64) -> Self {
        DatabaseValue::UInt64(value)
    }
}

impl From<f64> for DatabaseValue {
    fn from(value: f64) -> Self {
        DatabaseValue::Float64(value)
    }
}

impl From<String> for DatabaseValue {
    fn from(value: String) -> Self {
        DatabaseValue::String(value)
    }
}

impl From<&str> for DatabaseValue {
    fn from(value: &str) -> Self {
        DatabaseValue::String(value.to_string())
    }
}

impl From<chrono::NaiveTime> for DatabaseValue {
    fn from(value: chrono::NaiveTime) -> Self {
        DatabaseValue::Time(value)
    }
}

impl From<JsonValue> for DatabaseValue {
    fn from(value: JsonValue) -> Self {
        DatabaseValue::Json(value)
    }
}

impl<T> From<Option<T>> for DatabaseValue
where
    T: Into<DatabaseValue>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => DatabaseValue::Null,
        }
    }
}
