//! repl-dispatch - command resolution and dispatch for interactive shells.
//!
//! Applications register commands (optionally inside groups), then hand
//! input lines to a [`Shell`]. The shell resolves each line against the
//! registry and the user's aliases, checks arguments against the command's
//! calling convention, and runs the handler with a shared context.

pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod persistence;
pub mod shell;

pub use commands::{CommandDescriptor, CommandOutput};
pub use config::Config;
pub use error::{Result, ShellError};
pub use shell::Shell;
