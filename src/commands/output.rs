//! Transport-agnostic command output types.
//!
//! The shell returns these from line execution instead of printing directly,
//! so the interactive loop decides how to render them and tests can inspect
//! them.

/// Output from executing one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// Nothing to show (blank input, handler-driven commands).
    Empty,

    /// Informational text (help tables, confirmations).
    Info(String),

    /// Recoverable problem reported to the user.
    Error(String),

    /// Shell control action.
    Control(ControlAction),

    /// Several outputs in order.
    Multiple(Vec<CommandOutput>),
}

/// Control actions that affect the interactive loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    /// Leave the shell.
    Exit,

    /// Clear the terminal.
    ClearScreen,
}

impl CommandOutput {
    /// Creates an info message.
    pub fn info(msg: impl Into<String>) -> Self {
        Self::Info(msg.into())
    }

    /// Creates an error message.
    pub fn error(msg: impl Into<String>) -> Self {
        Self::Error(msg.into())
    }

    /// Creates a multiple output from a vector.
    pub fn multiple(outputs: Vec<CommandOutput>) -> Self {
        Self::Multiple(outputs)
    }

    /// Creates an exit control action.
    pub fn exit() -> Self {
        Self::Control(ControlAction::Exit)
    }

    /// Creates a clear screen control action.
    pub fn clear_screen() -> Self {
        Self::Control(ControlAction::ClearScreen)
    }

    /// Returns true if this output (or any nested output) asks to exit.
    pub fn is_exit(&self) -> bool {
        match self {
            Self::Control(ControlAction::Exit) => true,
            Self::Multiple(outputs) => outputs.iter().any(CommandOutput::is_exit),
            _ => false,
        }
    }

    /// Concatenates all text carried by this output, one message per line.
    pub fn text(&self) -> String {
        match self {
            Self::Info(s) | Self::Error(s) => s.clone(),
            Self::Multiple(outputs) => outputs
                .iter()
                .map(CommandOutput::text)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
            Self::Empty | Self::Control(_) => String::new(),
        }
    }
}
