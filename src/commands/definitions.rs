//! Command descriptors and calling conventions.
//!
//! Each registered command carries one [`CommandKind`], which fixes how its
//! arguments are validated and how it is executed:
//! - `Single`: no arguments, trailing input ignored
//! - `Free`: one or more words, passed as the raw remainder of the line
//! - `Strict`: exactly one word from a fixed option set
//! - `Parser`: runs an external script with the remainder as its arguments
//! - `Group`: a namespace of further commands
//! - `BuiltIn`: help, clear, alias and the exit keyword

use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};

/// Handler for a `Single` command.
pub type SingleHandler<C> = Box<dyn Fn(&mut C) -> anyhow::Result<()>>;

/// Handler for `Free` and `Strict` commands. Receives the argument payload.
pub type ArgHandler<C> = Box<dyn Fn(&str, &mut C) -> anyhow::Result<()>>;

/// Commands the shell provides itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltIn {
    /// Clear the screen.
    Clear,
    /// Print help tables.
    Help,
    /// Manage aliases.
    Alias,
    /// Leave the shell.
    Exit,
}

impl BuiltIn {
    /// Reserved name of the built-in. `Exit` takes its name from configuration.
    pub fn name(&self) -> Option<&'static str> {
        match self {
            Self::Clear => Some(CLEAR),
            Self::Help => Some(HELP),
            Self::Alias => Some(ALIAS),
            Self::Exit => None,
        }
    }
}

/// Name of the help built-in.
pub const HELP: &str = "help";
/// Name of the clear built-in.
pub const CLEAR: &str = "clear";
/// Name of the alias built-in.
pub const ALIAS: &str = "alias";

/// Calling convention of a command.
pub enum CommandKind<C> {
    Single(SingleHandler<C>),
    Free(ArgHandler<C>),
    Strict {
        options: IndexSet<String>,
        handler: ArgHandler<C>,
    },
    Parser {
        file: PathBuf,
    },
    Group(Group<C>),
    BuiltIn(BuiltIn),
}

impl<C> CommandKind<C> {
    /// Returns the label shown in the Type column of verbose help.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Single(_) => "single",
            Self::Free(_) => "free",
            Self::Strict { .. } => "strict",
            Self::Parser { .. } => "parser",
            Self::Group(_) => "group",
            Self::BuiltIn(_) => "built-in",
        }
    }
}

/// A registered command.
pub struct CommandDescriptor<C> {
    name: String,
    help: String,
    kind: CommandKind<C>,
}

impl<C> CommandDescriptor<C> {
    /// Creates a descriptor of any kind.
    pub fn new(name: impl Into<String>, help: impl Into<String>, kind: CommandKind<C>) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            kind,
        }
    }

    /// Creates a `Single` command.
    pub fn single<F>(name: impl Into<String>, help: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut C) -> anyhow::Result<()> + 'static,
    {
        Self::new(name, help, CommandKind::Single(Box::new(handler)))
    }

    /// Creates a `Free` command.
    pub fn free<F>(name: impl Into<String>, help: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&str, &mut C) -> anyhow::Result<()> + 'static,
    {
        Self::new(name, help, CommandKind::Free(Box::new(handler)))
    }

    /// Creates a `Strict` command accepting one of `options`.
    pub fn strict<F, I, S>(
        name: impl Into<String>,
        help: impl Into<String>,
        options: I,
        handler: F,
    ) -> Self
    where
        F: Fn(&str, &mut C) -> anyhow::Result<()> + 'static,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            help,
            CommandKind::Strict {
                options: options.into_iter().map(Into::into).collect(),
                handler: Box::new(handler),
            },
        )
    }

    /// Creates a `Parser` command running `file`.
    pub fn parser(name: impl Into<String>, help: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self::new(name, help, CommandKind::Parser { file: file.into() })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn kind(&self) -> &CommandKind<C> {
        &self.kind
    }

    /// Returns the option set of a `Strict` command.
    pub fn options(&self) -> Option<&IndexSet<String>> {
        match &self.kind {
            CommandKind::Strict { options, .. } => Some(options),
            _ => None,
        }
    }

    /// Returns the script of a `Parser` command.
    pub fn file(&self) -> Option<&Path> {
        match &self.kind {
            CommandKind::Parser { file } => Some(file),
            _ => None,
        }
    }

    pub(crate) fn as_group(&self) -> Option<&Group<C>> {
        match &self.kind {
            CommandKind::Group(group) => Some(group),
            _ => None,
        }
    }

    pub(crate) fn as_group_mut(&mut self) -> Option<&mut Group<C>> {
        match &mut self.kind {
            CommandKind::Group(group) => Some(group),
            _ => None,
        }
    }
}

impl<C> fmt::Debug for CommandDescriptor<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind.label())
            .finish()
    }
}

/// An ordered namespace of commands.
pub struct Group<C> {
    members: IndexMap<String, CommandDescriptor<C>>,
}

impl<C> Default for Group<C> {
    fn default() -> Self {
        Self {
            members: IndexMap::new(),
        }
    }
}

impl<C> Group<C> {
    /// Looks up a member by name.
    pub fn get(&self, name: &str) -> Option<&CommandDescriptor<C>> {
        self.members.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    /// Members in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &CommandDescriptor<C>> {
        self.members.values()
    }

    /// Member names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub(crate) fn insert(&mut self, descriptor: CommandDescriptor<C>) -> bool {
        if self.members.contains_key(descriptor.name()) {
            return false;
        }
        self.members
            .insert(descriptor.name().to_string(), descriptor);
        true
    }
}
