//! Error types for the migration engine
//!
//! Every failure carries enough context (table name, column name, version)
//! to diagnose without re-running the migration.

use thiserror::Error;

/// Result type alias for migration operations
pub type MigrationResult<T> = Result<T, MigrationError>;

/// Error types for migration operations
#[derive(Debug, Error)]
pub enum MigrationError {
    /// A column definition violates the model invariants
    #[error("invalid definition for column '{column}': {message}")]
    InvalidColumnDefinition { column: String, message: String },

    /// The dialect has no mapping for a native column type
    #[error("column '{column}' has no dialect mapping for native type '{native_type}'")]
    UnsupportedColumnType { column: String, native_type: String },

    /// The introspected table does not exist
    #[error("table '{table}' not found")]
    TableNotFound { table: String },

    /// A migration version could not be applied; the ledger was not touched
    #[error("migration {version} failed for table '{table}': {message}")]
    MigrationApplyFailed {
        version: String,
        table: String,
        message: String,
    },

    /// Database execution error
    #[error("database error: {0}")]
    Database(String),

    /// Migration artifact storage error
    #[error("storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem error while reading or writing migration artifacts
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

// Convert from sqlx errors
impl From<sqlx::Error> for MigrationError {
    fn from(err: sqlx::Error) -> Self {
        MigrationError::Database(err.to_string())
    }
}
