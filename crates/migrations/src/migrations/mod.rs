//! Migration System
//!
//! Generation of versioned migration definitions from live schemas, the
//! on-disk definition store, the applied-version ledger, and the runner
//! that replays definitions against a database.

pub mod definitions;
pub mod generator;
pub mod ledger;
pub mod runner;
pub mod store;

pub use definitions::{
    MigrationConfig, MigrationDefinition, MigrationRecord, MigrationRunResult,
};
pub use generator::MigrationGenerator;
pub use ledger::MigrationLedger;
pub use runner::MigrationRunner;
pub use store::MigrationStore;
