//! Database Adapter Abstractions
//!
//! This module provides the adapter seam between the migration core and
//! concrete database engines. The core only ever talks to the
//! [`DatabaseAdapter`](adapter::DatabaseAdapter) trait; `mysql` implements
//! it over sqlx, and `memory` provides an in-process engine emulating MySQL
//! column semantics for tests and dry runs.

pub mod adapter;
pub mod memory;
pub mod mysql;

// Re-export core traits and types
pub use adapter::*;
pub use memory::MemoryDatabase;
pub use mysql::MySqlAdapter;
