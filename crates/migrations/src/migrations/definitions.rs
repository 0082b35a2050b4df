//! Migration Definitions - Core types and structures for migrations
//!
//! Defines the fundamental types used throughout the migration system:
//! the versioned migration definition artifact, the ledger record, the
//! configuration, and run results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::schema::TableDefinition;

/// A generated, versioned description of one table's schema, replayable
/// against a database
///
/// Immutable after creation; regenerating a table overwrites its
/// definition for that version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationDefinition {
    /// Version identifier, derived from the generation timestamp; sorts
    /// ascending in application order
    pub version: String,
    /// The table this migration creates or extends
    pub table: TableDefinition,
    /// When the definition was generated
    pub generated_at: DateTime<Utc>,
}

impl MigrationDefinition {
    pub fn table_name(&self) -> &str {
        &self.table.name
    }
}

/// Ledger record of one applied migration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationRecord {
    /// Applied migration version
    pub version: String,
    /// When the migration was applied
    pub applied_at: DateTime<Utc>,
}

/// Configuration for the migration system
#[derive(Debug, Clone)]
pub struct MigrationConfig {
    /// Directory where migration definition files are stored
    pub migrations_dir: PathBuf,
    /// Table name for tracking applied migrations
    pub ledger_table: String,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            migrations_dir: PathBuf::from("migrations"),
            ledger_table: "morph_migrations".to_string(),
        }
    }
}

/// Result of running migrations
#[derive(Debug, Default)]
pub struct MigrationRunResult {
    /// Number of migrations that were applied
    pub applied_count: usize,
    /// Versions of migrations that were applied
    pub applied_versions: Vec<String>,
    /// Number of migrations that were skipped (already applied)
    pub skipped_count: usize,
    /// Total execution time in milliseconds
    pub execution_time_ms: u128,
}
