//! # morph-migrations: Schema Migration Engine
//!
//! Generates versioned migration definitions from a live database schema
//! and replays them against a target database, tracking applied versions
//! in a ledger.
//!
//! The core contract is the column type round-trip: a logically defined
//! column (type, size, scale, signedness, nullability, keys) translates to
//! engine DDL, reads back through schema introspection with the same
//! logical attributes, and the stored values survive drop/recreate/reinsert
//! cycles. Type mapping is pluggable per engine through the `Dialect`
//! trait; MySQL is the worked exemplar.

pub mod backends;
pub mod dialect;
pub mod error;
pub mod introspect;
pub mod migrations;
pub mod schema;

// Re-export core traits and types
pub use backends::{
    ColumnMetadata, DatabaseAdapter, DatabaseValue, IndexMetadata, MemoryDatabase, MySqlAdapter,
};
pub use dialect::{Dialect, MysqlDialect};
pub use error::{MigrationError, MigrationResult};
pub use introspect::SchemaIntrospector;
pub use migrations::{
    MigrationConfig, MigrationDefinition, MigrationGenerator, MigrationLedger, MigrationRecord,
    MigrationRunResult, MigrationRunner, MigrationStore,
};
pub use schema::{Column, ColumnType, IndexDefinition, TableDefinition};
