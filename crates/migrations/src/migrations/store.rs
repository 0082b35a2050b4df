//! Migration Store - File system operations for migration definitions
//!
//! One JSON file per definition, named by version, under a caller-chosen
//! directory. Loading returns definitions sorted ascending by version so
//! the runner applies them in generation order.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MigrationError, MigrationResult};
use crate::migrations::definitions::MigrationDefinition;

/// Persists and loads migration definition artifacts
pub struct MigrationStore {
    dir: PathBuf,
}

impl MigrationStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write a definition to `<dir>/<version>.json`, creating the
    /// directory if needed; an existing file for the version is overwritten
    pub fn save(&self, definition: &MigrationDefinition) -> MigrationResult<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("{}.json", definition.version));
        let payload = serde_json::to_string_pretty(definition)?;
        fs::write(&path, payload)?;
        tracing::debug!(
            version = %definition.version,
            path = %path.display(),
            "saved migration definition"
        );
        Ok(path)
    }

    /// Load every definition in the directory, sorted ascending by version
    ///
    /// A missing directory is an empty set, not an error.
    pub fn load_all(&self) -> MigrationResult<Vec<MigrationDefinition>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut definitions = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                definitions.push(self.load_file(&path)?);
            }
        }

        definitions.sort_by(|a, b| a.version.cmp(&b.version));
        Ok(definitions)
    }

    fn load_file(&self, path: &Path) -> MigrationResult<MigrationDefinition> {
        let payload = fs::read_to_string(path)?;
        serde_json::from_str(&payload).map_err(|e| {
            MigrationError::Storage(format!(
                "failed to parse migration file {}: {}",
                path.display(),
                e
            ))
        })
    }
}
