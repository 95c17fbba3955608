//! Alias persistence.
//!
//! The alias table is stored as a pretty-printed JSON object mapping alias
//! names to expansions. Key order is preserved across save and load.

mod atomic;

pub use atomic::atomic_write;

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::error::{Result, ShellError};

/// Reads and writes the alias file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasStore {
    path: PathBuf,
}

impl AliasStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored aliases.
    ///
    /// A missing file yields an empty table. A file that is not a JSON object
    /// of strings is moved to `<file>.bak` and an empty table is returned, so
    /// the next save does not destroy it.
    pub fn load(&self) -> Result<IndexMap<String, String>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No alias file yet");
            return Ok(IndexMap::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            ShellError::persistence(format!("Failed to read {}: {e}", self.path.display()))
        })?;

        match serde_json::from_str::<IndexMap<String, String>>(&content) {
            Ok(entries) => {
                info!(count = entries.len(), path = %self.path.display(), "Loaded aliases");
                Ok(entries)
            }
            Err(e) => {
                let backup = self.backup_path();
                warn!(
                    path = %self.path.display(),
                    backup = %backup.display(),
                    "Alias file is corrupt ({e}); starting with no aliases"
                );
                fs::rename(&self.path, &backup).map_err(|e| {
                    ShellError::persistence(format!(
                        "Failed to back up corrupt alias file to {}: {e}",
                        backup.display()
                    ))
                })?;
                Ok(IndexMap::new())
            }
        }
    }

    /// Writes the aliases, replacing the file atomically.
    pub fn save(&self, entries: &IndexMap<String, String>) -> Result<()> {
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| ShellError::persistence(format!("Failed to serialize aliases: {e}")))?;
        atomic_write(&self.path, json.as_bytes())?;
        debug!(count = entries.len(), path = %self.path.display(), "Saved aliases");
        Ok(())
    }

    fn backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".bak");
        PathBuf::from(name)
    }
}
