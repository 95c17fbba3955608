//! Command registry.
//!
//! Holds top-level commands and groups in one ordered map, so a name is
//! either a command, a group, or neither. Iteration follows registration
//! order, which is also the order every help table is rendered in.

use indexmap::IndexMap;
use tracing::{debug, info};

use super::definitions::{BuiltIn, CommandDescriptor, CommandKind, Group, ALIAS, CLEAR, HELP};
use crate::error::{Result, ShellError};

/// Result of looking a top-level name up.
pub enum Lookup<'a, C> {
    Command(&'a CommandDescriptor<C>),
    Group(&'a CommandDescriptor<C>, &'a Group<C>),
    None,
}

/// Registry of commands and groups.
pub struct CommandRegistry<C> {
    entries: IndexMap<String, CommandDescriptor<C>>,
    builtins_installed: bool,
}

impl<C> Default for CommandRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> CommandRegistry<C> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
            builtins_installed: false,
        }
    }

    /// Registers a command at top level or inside an existing group.
    ///
    /// Groups cannot be nested and built-ins are installed by the shell, so
    /// both kinds are rejected here.
    pub fn register(&mut self, descriptor: CommandDescriptor<C>, group: Option<&str>) -> Result<()> {
        match descriptor.kind() {
            CommandKind::Group(_) => {
                return Err(ShellError::config(format!(
                    "'{}' is a group; use add_group to create groups",
                    descriptor.name()
                )))
            }
            CommandKind::BuiltIn(_) => {
                return Err(ShellError::config(format!(
                    "'{}' is a built-in and cannot be registered",
                    descriptor.name()
                )))
            }
            _ => {}
        }
        self.check_name(descriptor.name())?;

        match group {
            None => {
                if self.entries.contains_key(descriptor.name()) {
                    return Err(ShellError::DuplicateName(descriptor.name().to_string()));
                }
                debug!(command = descriptor.name(), kind = descriptor.kind().label(), "Registered command");
                self.entries
                    .insert(descriptor.name().to_string(), descriptor);
            }
            Some(group_name) => {
                let group = self
                    .entries
                    .get_mut(group_name)
                    .and_then(CommandDescriptor::as_group_mut)
                    .ok_or_else(|| ShellError::GroupNotFound(group_name.to_string()))?;
                let name = descriptor.name().to_string();
                debug!(command = %name, group = group_name, "Registered group command");
                if !group.insert(descriptor) {
                    return Err(ShellError::DuplicateName(format!("{group_name} {name}")));
                }
            }
        }
        Ok(())
    }

    /// Creates an empty group.
    pub fn add_group(&mut self, name: &str, help: &str) -> Result<()> {
        self.check_name(name)?;
        if self.entries.contains_key(name) {
            return Err(ShellError::DuplicateName(name.to_string()));
        }
        debug!(group = name, "Created group");
        self.entries.insert(
            name.to_string(),
            CommandDescriptor::new(name, help, CommandKind::Group(Group::default())),
        );
        Ok(())
    }

    /// Appends the built-in commands after everything registered so far.
    ///
    /// Only the first exit keyword gets a registry entry, but every keyword
    /// is matched before any lookup, so none of them may name a registered
    /// command or group. Does nothing when called a second time.
    pub fn install_builtins(&mut self, exit_keywords: &[String], shell_name: &str) -> Result<()> {
        if self.builtins_installed {
            return Ok(());
        }

        let exit_keyword = exit_keywords
            .first()
            .ok_or_else(|| ShellError::config("exit_keywords must not be empty"))?;

        let builtins = [
            (CLEAR, "clear the screen".to_string(), BuiltIn::Clear),
            (HELP, "print this help banner".to_string(), BuiltIn::Help),
            (
                ALIAS,
                "manage command aliases (add|remove|view)".to_string(),
                BuiltIn::Alias,
            ),
            (exit_keyword.as_str(), format!("exit {shell_name}"), BuiltIn::Exit),
        ];

        let reserved = builtins
            .iter()
            .map(|(name, _, _)| *name)
            .chain(exit_keywords.iter().map(String::as_str));
        for name in reserved {
            if self.entries.contains_key(name) {
                return Err(ShellError::DuplicateName(name.to_string()));
            }
        }

        for (name, help, builtin) in builtins {
            self.entries.insert(
                name.to_string(),
                CommandDescriptor::new(name, help, CommandKind::BuiltIn(builtin)),
            );
        }

        self.builtins_installed = true;
        info!(exit_keyword = %exit_keyword, "Installed built-in commands");
        Ok(())
    }

    /// Looks up a top-level name.
    pub fn lookup(&self, name: &str) -> Lookup<'_, C> {
        match self.entries.get(name) {
            Some(descriptor) => match descriptor.as_group() {
                Some(group) => Lookup::Group(descriptor, group),
                None => Lookup::Command(descriptor),
            },
            None => Lookup::None,
        }
    }

    /// Returns the top-level descriptor with this name (commands and groups).
    pub fn get(&self, name: &str) -> Option<&CommandDescriptor<C>> {
        self.entries.get(name)
    }

    /// Returns the group with this name.
    pub fn group(&self, name: &str) -> Option<&Group<C>> {
        self.entries.get(name).and_then(CommandDescriptor::as_group)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Top-level entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &CommandDescriptor<C>> {
        self.entries.values()
    }

    /// Top-level names starting with `prefix`, in registration order.
    pub fn names_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .keys()
            .map(String::as_str)
            .filter(move |name| name.starts_with(prefix))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn builtins_installed(&self) -> bool {
        self.builtins_installed
    }

    fn check_name(&self, name: &str) -> Result<()> {
        if name.is_empty() || name.split_whitespace().count() != 1 || name.trim() != name {
            return Err(ShellError::config(format!(
                "Invalid command name '{name}': names must be a single word"
            )));
        }
        Ok(())
    }
}
