//! Migration State Ledger - persisted record of applied versions
//!
//! The ledger lives in a database table defined through the column
//! metamodel itself: `version` is the primary key, so a racing duplicate
//! apply fails on the uniqueness constraint and resolves as a clean no-op.
//! A process-scoped cache avoids re-reading the applied set on every
//! lookup; `reset()` drops the cache without touching the database.

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::backends::{DatabaseAdapter, DatabaseValue};
use crate::error::MigrationResult;
use crate::migrations::definitions::MigrationRecord;
use crate::schema::{Column, ColumnType, TableDefinition};

/// Tracks which migration versions have been applied
pub struct MigrationLedger {
    table: String,
    cache: Mutex<Option<HashSet<String>>>,
}

impl MigrationLedger {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            cache: Mutex::new(None),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// The ledger table's own schema
    fn definition(&self) -> TableDefinition {
        TableDefinition::new(&self.table)
            .column(
                Column::new("version", ColumnType::Varchar)
                    .size(255)
                    .primary(true),
            )
            .column(Column::new("applied_at", ColumnType::DateTime))
    }

    /// Create the ledger table when it does not exist yet
    pub async fn ensure(&self, adapter: &dyn DatabaseAdapter) -> MigrationResult<()> {
        if !adapter.table_exists(&self.table).await? {
            adapter.create_table(&self.definition()).await?;
            tracing::debug!(table = %self.table, "created migration ledger table");
        }
        Ok(())
    }

    /// The set of applied versions, served from the cache when warm
    pub async fn applied(&self, adapter: &dyn DatabaseAdapter) -> MigrationResult<HashSet<String>> {
        {
            let cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(set) = cache.as_ref() {
                return Ok(set.clone());
            }
        }

        let rows = adapter.fetch_column(&self.table, "version").await?;
        let set: HashSet<String> = rows
            .into_iter()
            .filter_map(|value| match value {
                DatabaseValue::String(version) => Some(version),
                _ => None,
            })
            .collect();

        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        *cache = Some(set.clone());
        Ok(set)
    }

    /// Every ledger record with its apply timestamp, in apply order
    pub async fn records(
        &self,
        adapter: &dyn DatabaseAdapter,
    ) -> MigrationResult<Vec<MigrationRecord>> {
        let versions = adapter.fetch_column(&self.table, "version").await?;
        let timestamps = adapter.fetch_column(&self.table, "applied_at").await?;

        let mut records = Vec::with_capacity(versions.len());
        for (version, applied_at) in versions.into_iter().zip(timestamps) {
            let version = match version {
                DatabaseValue::String(v) => v,
                _ => continue,
            };
            let applied_at = match applied_at {
                DatabaseValue::String(v) => v,
                _ => continue,
            };
            let applied_at = NaiveDateTime::parse_from_str(&applied_at, "%Y-%m-%d %H:%M:%S")
                .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
                .unwrap_or_else(|_| Utc::now());
            records.push(MigrationRecord {
                version,
                applied_at,
            });
        }
        Ok(records)
    }

    /// Record a version as applied
    ///
    /// If the insert fails and a fresh read shows the version present, a
    /// concurrent run recorded it first; that is a no-op, not an error.
    pub async fn record(&self, adapter: &dyn DatabaseAdapter, version: &str) -> MigrationResult<()> {
        let applied_at = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let insert = adapter
            .insert_row(
                &self.table,
                &[version.into(), applied_at.into()],
                &["version", "applied_at"],
            )
            .await;

        match insert {
            Ok(()) => {
                let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
                if let Some(set) = cache.as_mut() {
                    set.insert(version.to_string());
                }
                Ok(())
            }
            Err(err) => {
                self.reset();
                let fresh = self.applied(adapter).await?;
                if fresh.contains(version) {
                    tracing::warn!(
                        version = %version,
                        "version already recorded in ledger, treating as no-op"
                    );
                    Ok(())
                } else {
                    Err(err)
                }
            }
        }
    }

    /// Drop the cached applied set; the database is untouched
    pub fn reset(&self) {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        *cache = None;
    }
}
