//! Logging for the rdsh binary.
//!
//! Log lines would interleave with the prompt, so interactive sessions log to
//! a per-shell file that is appended to across sessions and rolled over once
//! it grows past [`MAX_LOG_BYTES`]. Every line of a session carries the
//! `session` span opened by [`session_span`].

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use tracing::Span;
use tracing_subscriber::EnvFilter;

/// Size at which the log file is moved aside before a new session starts.
pub const MAX_LOG_BYTES: u64 = 1024 * 1024;

/// Where log output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Append to a file.
    File(PathBuf),
    Stderr,
}

impl LogTarget {
    /// The log target for a shell named `shell_name`.
    pub fn for_shell(shell_name: &str, stderr: bool) -> Self {
        if stderr {
            Self::Stderr
        } else {
            Self::File(log_path_for(shell_name))
        }
    }
}

/// Installs the global subscriber.
///
/// Falls back to stderr when the log file cannot be opened, and returns the
/// target actually in use.
pub fn init(target: LogTarget) -> LogTarget {
    match target {
        LogTarget::File(path) => match open_log_file(&path) {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .with_env_filter(default_filter())
                    .with_writer(file)
                    .with_ansi(false)
                    .init();
                LogTarget::File(path)
            }
            Err(e) => {
                eprintln!("Warning: Could not open log file {}: {e}", path.display());
                init(LogTarget::Stderr)
            }
        },
        LogTarget::Stderr => {
            tracing_subscriber::fmt()
                .with_env_filter(default_filter())
                .with_writer(io::stderr)
                .init();
            LogTarget::Stderr
        }
    }
}

/// Span that tags every log line of one shell session.
pub fn session_span(shell_name: &str) -> Span {
    tracing::info_span!("session", shell = %shell_name, pid = std::process::id())
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    roll_over(path, MAX_LOG_BYTES)?;
    OpenOptions::new().create(true).append(true).open(path)
}

/// Moves `path` to `<path>.1` when it is larger than `limit`, replacing any
/// earlier rolled-over file. Returns whether the file was moved.
fn roll_over(path: &Path, limit: u64) -> io::Result<bool> {
    match fs::metadata(path) {
        Ok(meta) if meta.len() > limit => {
            fs::rename(path, rolled_path(path))?;
            Ok(true)
        }
        Ok(_) => Ok(false),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

fn rolled_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".1");
    PathBuf::from(name)
}

/// Log file for `shell_name` in the platform state directory.
///
/// `~/.local/state/repl-dispatch/<shell_name>.log` on Linux, the config
/// directory where there is no state directory, else the temp directory.
pub fn log_path_for(shell_name: &str) -> PathBuf {
    let file_name = format!("{shell_name}.log");
    dirs::state_dir()
        .or_else(dirs::config_dir)
        .map(|dir| dir.join("repl-dispatch").join(&file_name))
        .unwrap_or_else(|| std::env::temp_dir().join(file_name))
}
