//! Crash-safe file writes.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::{Result, ShellError};

/// Writes `data` to `path` through a temporary file in the same directory
/// followed by a rename. Missing parent directories are created.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| {
        ShellError::persistence(format!("Failed to create {}: {e}", dir.display()))
    })?;

    let write_error =
        |e: std::io::Error| ShellError::persistence(format!("Failed to write {}: {e}", path.display()));

    let mut temp_file = tempfile::NamedTempFile::new_in(dir).map_err(write_error)?;
    temp_file.write_all(data).map_err(write_error)?;
    temp_file.flush().map_err(write_error)?;
    temp_file.persist(path).map_err(|e| write_error(e.error))?;

    Ok(())
}
