//! Schema Metamodel
//!
//! Engine-independent descriptions of columns, indexes, and tables. These are
//! the value types that migration definitions serialize and that dialects map
//! to and from concrete DDL.

pub mod column;
pub mod table;

pub use column::{Column, ColumnType};
pub use table::{IndexDefinition, TableDefinition};
