//! Error types for repl-dispatch.
//!
//! Defines the main error enum used by the registry, the shell lifecycle and
//! the dispatcher. Recoverable user-facing problems (unknown commands, bad
//! alias edits) are not errors at this level; they are reported inline.

use thiserror::Error;

/// Main error type for shell setup and execution.
#[derive(Error, Debug)]
pub enum ShellError {
    /// Invalid configuration (bad config file, invalid settings, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Registration into a group that was never created.
    #[error("Group '{0}' not found")]
    GroupNotFound(String),

    /// A name registered twice in the same scope.
    #[error("Name '{0}' is already registered")]
    DuplicateName(String),

    /// Alias store read/write failures.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Failures while launching a dispatch target.
    #[error("Dispatch error: {0}")]
    Dispatch(String),

    /// A command handler returned an error.
    #[error("Command '{command}' failed: {source}")]
    Handler {
        command: String,
        #[source]
        source: anyhow::Error,
    },

    /// Interactive terminal failures (line editor, screen control).
    #[error("Terminal error: {0}")]
    Terminal(String),
}

impl ShellError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a persistence error with the given message.
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Creates a dispatch error with the given message.
    pub fn dispatch(msg: impl Into<String>) -> Self {
        Self::Dispatch(msg.into())
    }

    /// Wraps a handler failure with the name of the command that raised it.
    pub fn handler(command: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Handler {
            command: command.into(),
            source,
        }
    }

    /// Creates a terminal error with the given message.
    pub fn terminal(msg: impl Into<String>) -> Self {
        Self::Terminal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) | Self::GroupNotFound(_) | Self::DuplicateName(_) => {
                "Configuration Error"
            }
            Self::Persistence(_) => "Persistence Error",
            Self::Dispatch(_) => "Dispatch Error",
            Self::Handler { .. } => "Handler Error",
            Self::Terminal(_) => "Terminal Error",
        }
    }

    /// Returns true for errors raised while building the command set.
    pub fn is_configuration(&self) -> bool {
        self.category() == "Configuration Error"
    }
}

/// Result type alias using ShellError.
pub type Result<T> = std::result::Result<T, ShellError>;
