//! Input resolution.
//!
//! Turns one raw input line into a [`Resolution`]: a built-in action, a
//! type-checked [`DispatchDecision`], or a [`ResolutionFailure`] that drives
//! suggestion output.
//!
//! Order of checks:
//! 1. empty input is a no-op
//! 2. exit keywords
//! 3. `help [prefix]`
//! 4. `clear`, `alias add|remove|view`
//! 5. a group name alone shows the group's help
//! 6. top-level command, then group member, then alias
//!
//! An alias is expanded once. The expanded line runs through the same checks
//! with alias lookup disabled, so aliases never chain.

use std::fmt;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use super::aliases::AliasTable;
use super::definitions::{
    ArgHandler, BuiltIn, CommandDescriptor, CommandKind, Group, SingleHandler, ALIAS, CLEAR, HELP,
};
use super::registry::{CommandRegistry, Lookup};
use super::tokenizer::SplitLine;

/// Which help table to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelpRequest {
    /// Every top-level command and group.
    Full,
    /// Top-level names starting with the prefix.
    Filtered(String),
    /// Members of one group.
    Group(String),
}

/// Parsed `alias` sub-command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasAction {
    Add { name: String, expansion: String },
    Remove { name: String },
    View,
    /// Malformed `alias` input; print usage.
    Usage,
}

/// Why a line could not be turned into a dispatch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionFailure {
    #[error("Unknown command: {token}")]
    UnknownCommand { token: String },

    #[error("Unknown command '{token}' in group '{group}'")]
    UnknownGroupMember { group: String, token: String },

    #[error("Argument required for '{command}'")]
    ArgumentRequired { command: String },

    #[error("Invalid option '{given}' for '{command}'")]
    InvalidOption {
        command: String,
        given: String,
        options: Vec<String>,
    },

    #[error("'{command}' takes exactly one argument")]
    TooManyArguments { command: String },

    #[error("Alias '{alias}' expands to alias '{target}'; aliases cannot reference other aliases")]
    ChainedAlias { alias: String, target: String },

    #[error("Alias '{alias}' has an empty expansion")]
    EmptyAlias { alias: String },
}

impl ResolutionFailure {
    /// The token suggestions are computed from, if any.
    pub fn unresolved_token(&self) -> Option<&str> {
        match self {
            Self::UnknownCommand { token } | Self::UnknownGroupMember { token, .. } => Some(token),
            Self::InvalidOption { given, .. } => Some(given),
            Self::ChainedAlias { target, .. } => Some(target),
            _ => None,
        }
    }
}

/// What the dispatcher will run, with its validated arguments.
pub enum DispatchAction<'a, C> {
    Single(&'a SingleHandler<C>),
    Free {
        handler: &'a ArgHandler<C>,
        argument: String,
    },
    Strict {
        handler: &'a ArgHandler<C>,
        option: String,
    },
    Parser {
        file: &'a Path,
        arguments: String,
    },
}

/// A fully resolved command invocation.
pub struct DispatchDecision<'a, C> {
    /// Name of the command as registered.
    pub command: &'a str,
    /// Group the command belongs to.
    pub group: Option<&'a str>,
    pub action: DispatchAction<'a, C>,
}

impl<C> DispatchDecision<'_, C> {
    /// `group command` for group members, `command` otherwise.
    pub fn qualified_name(&self) -> String {
        qualify(self.group, self.command)
    }

    /// Calling convention label.
    pub fn kind_label(&self) -> &'static str {
        match self.action {
            DispatchAction::Single(_) => "single",
            DispatchAction::Free { .. } => "free",
            DispatchAction::Strict { .. } => "strict",
            DispatchAction::Parser { .. } => "parser",
        }
    }

    /// The argument payload handed to the command.
    pub fn argument(&self) -> Option<&str> {
        match &self.action {
            DispatchAction::Single(_) => None,
            DispatchAction::Free { argument, .. } => Some(argument),
            DispatchAction::Strict { option, .. } => Some(option),
            DispatchAction::Parser { arguments, .. } => Some(arguments),
        }
    }
}

impl<C> fmt::Debug for DispatchDecision<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchDecision")
            .field("command", &self.qualified_name())
            .field("kind", &self.kind_label())
            .field("argument", &self.argument())
            .finish()
    }
}

/// Outcome of resolving one input line.
pub enum Resolution<'a, C> {
    /// Blank input.
    Empty,
    Exit,
    Help(HelpRequest),
    Clear,
    Alias(AliasAction),
    Dispatch(DispatchDecision<'a, C>),
    Failure(ResolutionFailure),
}

/// Resolves input lines against a registry and an alias table.
pub struct CommandRouter<'r, 't, C> {
    registry: &'r CommandRegistry<C>,
    aliases: &'t AliasTable,
    exit_keywords: &'t [String],
}

impl<'r, 't, C> CommandRouter<'r, 't, C> {
    pub fn new(
        registry: &'r CommandRegistry<C>,
        aliases: &'t AliasTable,
        exit_keywords: &'t [String],
    ) -> Self {
        Self {
            registry,
            aliases,
            exit_keywords,
        }
    }

    /// Resolves one input line.
    pub fn resolve(&self, input: &str) -> Resolution<'r, C> {
        self.classify(&SplitLine::new(input), None)
    }

    /// Runs the checks on a split line. `via_alias` is set while resolving an
    /// alias expansion and disables further alias lookup.
    fn classify(&self, line: &SplitLine<'_>, via_alias: Option<&str>) -> Resolution<'r, C> {
        let Some(head) = line.token(0) else {
            return Resolution::Empty;
        };

        if self.exit_keywords.iter().any(|k| k == head) {
            return Resolution::Exit;
        }

        if let Some(builtin) = builtin_named(head) {
            return self.builtin(builtin, line);
        }

        match self.registry.lookup(head) {
            Lookup::Group(_, _) if line.len() == 1 => {
                Resolution::Help(HelpRequest::Group(head.to_string()))
            }
            Lookup::Group(descriptor, group) => self.resolve_member(descriptor, group, line),
            Lookup::Command(descriptor) => self.apply_policy(descriptor, None, line, 0),
            Lookup::None => match via_alias {
                None => self.expand_alias(head, line),
                Some(alias) if self.aliases.contains(head) => {
                    Resolution::Failure(ResolutionFailure::ChainedAlias {
                        alias: alias.to_string(),
                        target: head.to_string(),
                    })
                }
                Some(_) => Resolution::Failure(ResolutionFailure::UnknownCommand {
                    token: head.to_string(),
                }),
            },
        }
    }

    fn builtin(&self, builtin: BuiltIn, line: &SplitLine<'_>) -> Resolution<'r, C> {
        match builtin {
            BuiltIn::Exit => Resolution::Exit,
            BuiltIn::Clear => Resolution::Clear,
            BuiltIn::Help => match line.token(1) {
                Some(prefix) => Resolution::Help(HelpRequest::Filtered(prefix.to_string())),
                None => Resolution::Help(HelpRequest::Full),
            },
            BuiltIn::Alias => Resolution::Alias(parse_alias_action(line)),
        }
    }

    fn resolve_member(
        &self,
        group_descriptor: &'r CommandDescriptor<C>,
        group: &'r Group<C>,
        line: &SplitLine<'_>,
    ) -> Resolution<'r, C> {
        let member = line.token(1).unwrap_or_default();
        match group.get(member) {
            Some(descriptor) => {
                self.apply_policy(descriptor, Some(group_descriptor.name()), line, 1)
            }
            None => Resolution::Failure(ResolutionFailure::UnknownGroupMember {
                group: group_descriptor.name().to_string(),
                token: member.to_string(),
            }),
        }
    }

    fn expand_alias(&self, head: &str, line: &SplitLine<'_>) -> Resolution<'r, C> {
        let Some(expansion) = self.aliases.get(head) else {
            return Resolution::Failure(ResolutionFailure::UnknownCommand {
                token: head.to_string(),
            });
        };

        // User text after the alias token is appended with its spacing intact
        let expanded = format!("{}{}", expansion.trim(), line.suffix_after(0));
        debug!(alias = head, expanded = %expanded, "Expanding alias");

        let expanded_line = SplitLine::new(&expanded);
        if expanded_line.is_empty() {
            return Resolution::Failure(ResolutionFailure::EmptyAlias {
                alias: head.to_string(),
            });
        }
        self.classify(&expanded_line, Some(head))
    }

    /// Validates arguments for the command's calling convention.
    ///
    /// `index` is the position of the command token in `line`.
    fn apply_policy(
        &self,
        descriptor: &'r CommandDescriptor<C>,
        group: Option<&'r str>,
        line: &SplitLine<'_>,
        index: usize,
    ) -> Resolution<'r, C> {
        let arg_count = line.len().saturating_sub(index + 1);

        let action = match descriptor.kind() {
            CommandKind::Single(handler) => DispatchAction::Single(handler),
            CommandKind::Free(handler) => {
                if arg_count == 0 {
                    return Resolution::Failure(ResolutionFailure::ArgumentRequired {
                        command: qualify(group, descriptor.name()),
                    });
                }
                DispatchAction::Free {
                    handler,
                    argument: line.remainder_after(index).to_string(),
                }
            }
            CommandKind::Strict { options, handler } => match line.token(index + 1) {
                None => {
                    return Resolution::Failure(ResolutionFailure::ArgumentRequired {
                        command: qualify(group, descriptor.name()),
                    })
                }
                Some(_) if arg_count > 1 => {
                    return Resolution::Failure(ResolutionFailure::TooManyArguments {
                        command: qualify(group, descriptor.name()),
                    })
                }
                Some(given) if options.contains(given) => DispatchAction::Strict {
                    handler,
                    option: given.to_string(),
                },
                Some(given) => {
                    return Resolution::Failure(ResolutionFailure::InvalidOption {
                        command: qualify(group, descriptor.name()),
                        given: given.to_string(),
                        options: options.iter().cloned().collect(),
                    })
                }
            },
            CommandKind::Parser { file } => DispatchAction::Parser {
                file: file.as_path(),
                arguments: line.remainder_after(index).to_string(),
            },
            CommandKind::BuiltIn(builtin) => return self.builtin(*builtin, line),
            // Registry never nests groups
            CommandKind::Group(_) => {
                return Resolution::Failure(ResolutionFailure::UnknownCommand {
                    token: descriptor.name().to_string(),
                })
            }
        };

        let decision = DispatchDecision {
            command: descriptor.name(),
            group,
            action,
        };
        debug!(?decision, "Resolved command");
        Resolution::Dispatch(decision)
    }
}

fn builtin_named(name: &str) -> Option<BuiltIn> {
    match name {
        HELP => Some(BuiltIn::Help),
        CLEAR => Some(BuiltIn::Clear),
        ALIAS => Some(BuiltIn::Alias),
        _ => None,
    }
}

/// Parses `alias add <name> <expansion...>`, `alias remove <name>` and
/// `alias view`.
fn parse_alias_action(line: &SplitLine<'_>) -> AliasAction {
    match (line.token(1), line.token(2)) {
        (Some("add"), Some(name)) if line.len() >= 4 => AliasAction::Add {
            name: name.to_string(),
            expansion: line.remainder_after(2).trim().to_string(),
        },
        (Some("remove"), Some(name)) if line.len() == 3 => AliasAction::Remove {
            name: name.to_string(),
        },
        (Some("view"), None) => AliasAction::View,
        _ => AliasAction::Usage,
    }
}

fn qualify(group: Option<&str>, command: &str) -> String {
    match group {
        Some(group) => format!("{group} {command}"),
        None => command.to_string(),
    }
}
