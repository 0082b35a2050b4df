//! Dialect Abstraction
//!
//! A dialect owns the bidirectional mapping between the logical column
//! metamodel and one engine's concrete DDL and type-metadata conventions.
//! The migration core is dialect-agnostic; adapters select a dialect at
//! construction time.

pub mod mysql;

pub use mysql::MysqlDialect;

use crate::backends::ColumnMetadata;
use crate::error::MigrationResult;
use crate::schema::{Column, TableDefinition};

/// Bidirectional mapping between logical columns and one engine's DDL
pub trait Dialect: Send + Sync {
    /// Dialect identifier (e.g. "mysql")
    fn name(&self) -> &'static str;

    /// Quote an identifier for this engine
    fn quote(&self, identifier: &str) -> String;

    /// Forward mapping: render one column as a DDL fragment, including
    /// type, signedness, nullability, default, auto-increment, and
    /// primary-key clauses
    fn column_ddl(&self, column: &Column) -> MigrationResult<String>;

    /// Inverse mapping: reconstruct a logical column from introspected
    /// engine metadata
    ///
    /// The logical type is derived from the native type *name*; display
    /// widths are cosmetic and never drive the classification.
    fn column_from_metadata(&self, meta: &ColumnMetadata) -> MigrationResult<Column>;

    /// The native type string as the engine reports it after creation,
    /// with engine normalization applied (default display widths, decimal
    /// defaults, normalized enum value lists)
    fn canonical_column_type(&self, column: &Column) -> MigrationResult<String>;

    /// Full CREATE TABLE statement for a table definition
    fn create_table_sql(&self, definition: &TableDefinition) -> MigrationResult<String>;

    /// ALTER TABLE ... ADD COLUMN statement, honoring the column's
    /// placement hint (`first`) or an explicit `after` column
    fn add_column_sql(
        &self,
        table: &str,
        column: &Column,
        after: Option<&str>,
    ) -> MigrationResult<String>;

    /// DROP TABLE statement
    fn drop_table_sql(&self, table: &str) -> String;
}
