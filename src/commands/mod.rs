//! Command model, resolution and dispatch.
//!
//! Resolution is kept separate from execution so that parsing and argument
//! checks can be tested without running any handler.

pub mod aliases;
pub mod definitions;
pub mod dispatcher;
pub mod help;
pub mod output;
pub mod registry;
pub mod router;
pub mod tokenizer;

pub use aliases::{AliasChange, AliasError, AliasTable};
pub use definitions::{ArgHandler, BuiltIn, CommandDescriptor, CommandKind, Group, SingleHandler};
pub use dispatcher::Dispatcher;
pub use help::HelpStyle;
pub use output::{CommandOutput, ControlAction};
pub use registry::{CommandRegistry, Lookup};
pub use router::{
    AliasAction, CommandRouter, DispatchAction, DispatchDecision, HelpRequest, Resolution,
    ResolutionFailure,
};
