//! Migration Runner - applies definitions against a database
//!
//! Loads persisted definitions ascending by version, consults the ledger,
//! and emits DDL through the adapter. Apply + record is one logical unit:
//! on DDL failure the ledger is untouched and the failure surfaces as
//! `MigrationApplyFailed`. A failed table blocks its own later versions
//! but never unrelated tables in the same batch.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use crate::backends::DatabaseAdapter;
use crate::error::{MigrationError, MigrationResult};
use crate::migrations::definitions::{MigrationConfig, MigrationDefinition, MigrationRunResult};
use crate::migrations::ledger::MigrationLedger;
use crate::migrations::store::MigrationStore;

/// Applies migration definitions and tracks completion in the ledger
pub struct MigrationRunner {
    adapter: Arc<dyn DatabaseAdapter>,
    config: MigrationConfig,
    store: MigrationStore,
    ledger: MigrationLedger,
}

impl MigrationRunner {
    pub fn new(adapter: Arc<dyn DatabaseAdapter>, config: MigrationConfig) -> Self {
        let store = MigrationStore::new(&config.migrations_dir);
        let ledger = MigrationLedger::new(config.ledger_table.clone());
        Self {
            adapter,
            config,
            store,
            ledger,
        }
    }

    pub fn config(&self) -> &MigrationConfig {
        &self.config
    }

    pub fn ledger(&self) -> &MigrationLedger {
        &self.ledger
    }

    /// Run all pending migrations, ascending by version
    ///
    /// Already-applied versions are skipped (a second run over the same set
    /// is a no-op success). When some versions fail, the rest of the batch
    /// still runs for unrelated tables and the first failure is returned.
    pub async fn run(&self) -> MigrationResult<MigrationRunResult> {
        let start = Instant::now();
        let mut result = MigrationRunResult::default();

        let definitions = self.store.load_all()?;
        if definitions.is_empty() {
            result.execution_time_ms = start.elapsed().as_millis();
            return Ok(result);
        }

        self.ledger.ensure(&*self.adapter).await?;
        let applied = self.ledger.applied(&*self.adapter).await?;

        let mut failed_tables: HashSet<String> = HashSet::new();
        let mut first_failure: Option<MigrationError> = None;

        for definition in &definitions {
            if applied.contains(&definition.version) {
                tracing::debug!(version = %definition.version, "skipping applied migration");
                result.skipped_count += 1;
                continue;
            }
            if failed_tables.contains(definition.table_name()) {
                tracing::warn!(
                    version = %definition.version,
                    table = %definition.table_name(),
                    "skipping version for previously failed table"
                );
                continue;
            }

            match self.apply(definition).await {
                Ok(()) => {
                    tracing::info!(
                        version = %definition.version,
                        table = %definition.table_name(),
                        "applied migration"
                    );
                    result.applied_count += 1;
                    result.applied_versions.push(definition.version.clone());
                }
                Err(err) => {
                    tracing::error!(
                        version = %definition.version,
                        table = %definition.table_name(),
                        error = %err,
                        "migration failed"
                    );
                    failed_tables.insert(definition.table_name().to_string());
                    if first_failure.is_none() {
                        first_failure = Some(err);
                    }
                }
            }
        }

        if let Some(err) = first_failure {
            return Err(err);
        }
        result.execution_time_ms = start.elapsed().as_millis();
        Ok(result)
    }

    /// Clear cached ledger state; the database and the definition files on
    /// disk are untouched
    pub fn reset_storage(&self) {
        self.ledger.reset();
    }

    /// Apply one definition and record it, as a single logical unit
    async fn apply(&self, definition: &MigrationDefinition) -> MigrationResult<()> {
        if let Err(err) = self.apply_schema(definition).await {
            return Err(self.apply_failed(definition, err));
        }
        self.ledger
            .record(&*self.adapter, &definition.version)
            .await
            .map_err(|err| self.apply_failed(definition, err))
    }

    async fn apply_schema(&self, definition: &MigrationDefinition) -> MigrationResult<()> {
        if self.adapter.table_exists(definition.table_name()).await? {
            // The table may exist because a previous run created it but
            // died before the ledger write; re-running must converge, so
            // only missing pieces are added.
            self.apply_additive(definition).await
        } else {
            self.adapter.create_table(&definition.table).await
        }
    }

    /// Additive alter: add definition columns missing from the live table,
    /// in definition order. Type drift on existing columns is reported and
    /// left alone; modifying or dropping live columns is an extension
    /// point, not something the runner does implicitly.
    async fn apply_additive(&self, definition: &MigrationDefinition) -> MigrationResult<()> {
        let table = definition.table_name();
        let live = self.adapter.describe_columns(table).await?;
        let live_names: HashSet<&str> = live.iter().map(|m| m.name.as_str()).collect();
        let dialect = self.adapter.dialect();

        let mut previous: Option<&str> = None;
        for column in &definition.table.columns {
            if live_names.contains(column.name.as_str()) {
                if let Some(meta) = live.iter().find(|m| m.name == column.name) {
                    let canonical = dialect.canonical_column_type(column)?;
                    if meta.column_type != canonical {
                        tracing::warn!(
                            table = %table,
                            column = %column.name,
                            live = %meta.column_type,
                            definition = %canonical,
                            "column type drift detected; leaving live column unchanged"
                        );
                    }
                }
                previous = Some(column.name.as_str());
                continue;
            }

            let after = if column.first { None } else { previous };
            self.adapter.add_column(table, column, after).await?;
            previous = Some(column.name.as_str());
        }
        Ok(())
    }

    fn apply_failed(
        &self,
        definition: &MigrationDefinition,
        err: MigrationError,
    ) -> MigrationError {
        MigrationError::MigrationApplyFailed {
            version: definition.version.clone(),
            table: definition.table_name().to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::MemoryDatabase;
    use crate::schema::{Column, ColumnType, TableDefinition};
    use chrono::Utc;
    use tempfile::TempDir;

    fn definition(version: &str, table: TableDefinition) -> MigrationDefinition {
        MigrationDefinition {
            version: version.to_string(),
            table,
            generated_at: Utc::now(),
        }
    }

    fn config(dir: &TempDir) -> MigrationConfig {
        MigrationConfig {
            migrations_dir: dir.path().to_path_buf(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_run_creates_tables_and_records_versions() {
        let dir = TempDir::new().unwrap();
        let store = MigrationStore::new(dir.path());
        store
            .save(&definition(
                "20240101120000_users",
                TableDefinition::new("users")
                    .column(Column::new("id", ColumnType::Integer).primary(true)),
            ))
            .unwrap();

        let db = Arc::new(MemoryDatabase::new());
        let runner = MigrationRunner::new(db.clone(), config(&dir));

        let result = runner.run().await.unwrap();
        assert_eq!(result.applied_count, 1);
        assert_eq!(result.applied_versions, vec!["20240101120000_users"]);
        assert!(db.table_exists("users").await.unwrap());
    }

    #[tokio::test]
    async fn test_second_run_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let store = MigrationStore::new(dir.path());
        store
            .save(&definition(
                "20240101120000_users",
                TableDefinition::new("users")
                    .column(Column::new("id", ColumnType::Integer).primary(true)),
            ))
            .unwrap();

        let db = Arc::new(MemoryDatabase::new());
        let runner = MigrationRunner::new(db.clone(), config(&dir));

        runner.run().await.unwrap();
        let second = runner.run().await.unwrap();
        assert_eq!(second.applied_count, 0);
        assert_eq!(second.skipped_count, 1);
    }

    #[tokio::test]
    async fn test_failed_table_does_not_block_unrelated_tables() {
        let dir = TempDir::new().unwrap();
        let store = MigrationStore::new(dir.path());
        // Sorts first and fails: a table with no columns cannot be created.
        store
            .save(&definition(
                "20240101110000_broken",
                TableDefinition::new("broken"),
            ))
            .unwrap();
        store
            .save(&definition(
                "20240101120000_good",
                TableDefinition::new("good")
                    .column(Column::new("id", ColumnType::Integer).primary(true)),
            ))
            .unwrap();

        let db = Arc::new(MemoryDatabase::new());
        let runner = MigrationRunner::new(db.clone(), config(&dir));

        let err = runner.run().await.unwrap_err();
        assert!(matches!(
            err,
            MigrationError::MigrationApplyFailed { ref version, ref table, .. }
                if version == "20240101110000_broken" && table == "broken"
        ));
        // The unrelated table still went through and was recorded.
        assert!(db.table_exists("good").await.unwrap());
        let applied = runner.ledger().applied(&*db).await.unwrap();
        assert!(applied.contains("20240101120000_good"));
        assert!(!applied.contains("20240101110000_broken"));
    }

    #[tokio::test]
    async fn test_existing_matching_table_is_recorded_without_ddl() {
        let dir = TempDir::new().unwrap();
        let table = TableDefinition::new("users")
            .column(Column::new("id", ColumnType::Integer).primary(true));
        let store = MigrationStore::new(dir.path());
        store
            .save(&definition("20240101120000_users", table.clone()))
            .unwrap();

        let db = Arc::new(MemoryDatabase::new());
        // The table already exists (e.g. a previous run died before the
        // ledger write); re-running converges and records the version.
        db.create_table(&table).await.unwrap();

        let runner = MigrationRunner::new(db.clone(), config(&dir));
        let result = runner.run().await.unwrap();
        assert_eq!(result.applied_count, 1);
        let applied = runner.ledger().applied(&*db).await.unwrap();
        assert!(applied.contains("20240101120000_users"));
    }

    #[tokio::test]
    async fn test_additive_alter_adds_missing_columns() {
        let dir = TempDir::new().unwrap();
        let store = MigrationStore::new(dir.path());
        store
            .save(&definition(
                "20240101120000_users",
                TableDefinition::new("users")
                    .column(Column::new("id", ColumnType::Integer).primary(true))
                    .column(Column::new("age", ColumnType::TinyInteger).unsigned(true)),
            ))
            .unwrap();

        let db = Arc::new(MemoryDatabase::new());
        db.create_table(
            &TableDefinition::new("users")
                .column(Column::new("id", ColumnType::Integer).primary(true)),
        )
        .await
        .unwrap();

        let runner = MigrationRunner::new(db.clone(), config(&dir));
        runner.run().await.unwrap();

        let names: Vec<String> = db
            .describe_columns("users")
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["id", "age"]);
    }

    #[tokio::test]
    async fn test_empty_store_runs_clean_without_touching_db() {
        let dir = TempDir::new().unwrap();
        let db = Arc::new(MemoryDatabase::new());
        let runner = MigrationRunner::new(db.clone(), config(&dir));

        let result = runner.run().await.unwrap();
        assert_eq!(result.applied_count, 0);
        // Not even the ledger table is created for an empty batch.
        assert!(!db.table_exists("morph_migrations").await.unwrap());
    }
}
