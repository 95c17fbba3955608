//! Dispatch of resolved commands.
//!
//! Handlers run synchronously on the calling thread and their errors are
//! propagated. Parser commands run `<interpreter> <file> <args...>` as a
//! child process without a shell; the loop waits for the child and only
//! logs its exit status.

use std::process::Command;

use tracing::{debug, warn};

use super::output::CommandOutput;
use super::router::{DispatchAction, DispatchDecision};
use super::tokenizer::split_args;
use crate::error::{Result, ShellError};

/// Executes dispatch decisions.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    interpreter: String,
}

impl Dispatcher {
    /// Creates a dispatcher running parser commands with `interpreter`.
    pub fn new(interpreter: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }

    pub fn interpreter(&self) -> &str {
        &self.interpreter
    }

    /// Runs the decision against `context`.
    pub fn dispatch<C>(&self, decision: DispatchDecision<'_, C>, context: &mut C) -> Result<CommandOutput> {
        debug!(?decision, "Dispatching");

        let result = match &decision.action {
            DispatchAction::Single(handler) => handler(context),
            DispatchAction::Free { handler, argument } => handler(argument.as_str(), context),
            DispatchAction::Strict { handler, option } => handler(option.as_str(), context),
            DispatchAction::Parser { file, arguments } => {
                return Ok(self.run_external(file, arguments));
            }
        };

        result
            .map(|()| CommandOutput::Empty)
            .map_err(|e| ShellError::handler(decision.qualified_name(), e))
    }

    /// Runs an external script and waits for it. Output is inherited.
    fn run_external(&self, file: &std::path::Path, arguments: &str) -> CommandOutput {
        let args = split_args(arguments);
        debug!(
            interpreter = %self.interpreter,
            file = %file.display(),
            ?args,
            "Spawning external command"
        );

        match Command::new(&self.interpreter).arg(file).args(&args).status() {
            Ok(status) if status.success() => CommandOutput::Empty,
            Ok(status) => {
                warn!(file = %file.display(), %status, "External command exited unsuccessfully");
                CommandOutput::Empty
            }
            Err(e) => {
                let err = ShellError::dispatch(format!(
                    "Failed to run {} {}: {e}",
                    self.interpreter,
                    file.display()
                ));
                warn!("{err}");
                CommandOutput::error(err.to_string())
            }
        }
    }
}
