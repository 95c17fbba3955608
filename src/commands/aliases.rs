//! Alias table.
//!
//! Maps an alias token to an expansion string. Expansions are re-tokenized
//! lazily at resolution time; only the head of the expansion is checked when
//! the alias is added.

use indexmap::IndexMap;
use thiserror::Error;

use super::registry::CommandRegistry;

/// Why an alias edit was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AliasError {
    #[error("'{0}' is already a command and cannot be used as an alias")]
    NameIsCommand(String),

    #[error("'{0}' is an exit keyword and cannot be used as an alias")]
    NameIsExitKeyword(String),

    #[error("Command '{0}' does not exist")]
    TargetNotFound(String),

    #[error("Alias '{0}' needs a command to expand to")]
    EmptyExpansion(String),

    #[error("Alias '{0}' does not exist")]
    NotFound(String),
}

/// Whether `add` created a new alias or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasChange {
    Added,
    Updated,
}

/// Ordered alias → expansion table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    entries: IndexMap<String, String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from persisted entries without validation.
    pub fn from_entries(entries: IndexMap<String, String>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &IndexMap<String, String> {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds or replaces an alias.
    ///
    /// The name must not be a top-level command, group, built-in or exit
    /// keyword, and the first word of the expansion must be one.
    pub fn add<C>(
        &mut self,
        name: &str,
        expansion: &str,
        registry: &CommandRegistry<C>,
        exit_keywords: &[String],
    ) -> Result<AliasChange, AliasError> {
        if exit_keywords.iter().any(|k| k == name) {
            return Err(AliasError::NameIsExitKeyword(name.to_string()));
        }
        if registry.contains(name) {
            return Err(AliasError::NameIsCommand(name.to_string()));
        }

        let expansion = expansion.trim();
        let target = expansion
            .split_whitespace()
            .next()
            .ok_or_else(|| AliasError::EmptyExpansion(name.to_string()))?;
        if !registry.contains(target) && !exit_keywords.iter().any(|k| k == target) {
            return Err(AliasError::TargetNotFound(target.to_string()));
        }

        let previous = self
            .entries
            .insert(name.to_string(), expansion.to_string());
        Ok(if previous.is_some() {
            AliasChange::Updated
        } else {
            AliasChange::Added
        })
    }

    /// Removes an alias, returning its expansion.
    pub fn remove(&mut self, name: &str) -> Result<String, AliasError> {
        self.entries
            .shift_remove(name)
            .ok_or_else(|| AliasError::NotFound(name.to_string()))
    }
}
