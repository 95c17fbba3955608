//! Configuration management for repl-dispatch.
//!
//! Handles loading the shell configuration from a TOML file: prompt and exit
//! behaviour, the startup banner, and groups and parser commands declared
//! without writing any Rust.

use crate::commands::definitions::{ALIAS, CLEAR, HELP};
use crate::error::{Result, ShellError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Interactive shell settings.
    #[serde(default)]
    pub shell: ShellConfig,

    /// Startup banner settings.
    #[serde(default)]
    pub banner: BannerConfig,

    /// Groups created before any command is registered.
    #[serde(default)]
    pub groups: Vec<GroupConfig>,

    /// Parser commands backed by external script files.
    #[serde(default)]
    pub commands: Vec<ParserCommandConfig>,
}

/// Interactive shell settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Name shown in the exit keyword's help entry.
    #[serde(default = "default_name")]
    pub name: String,

    /// Input prompt.
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Message printed when the shell exits.
    #[serde(default = "default_exit_message")]
    pub exit_message: String,

    /// Keywords that end the session. The first one is listed in help.
    #[serde(default = "default_exit_keywords")]
    pub exit_keywords: Vec<String>,

    /// Adds a Type column to help tables.
    #[serde(default)]
    pub verbose_help: bool,

    /// Number of spaces help tables are indented by.
    #[serde(default = "default_help_indent")]
    pub help_indent: usize,

    /// Program used to run parser command files.
    #[serde(default = "default_interpreter")]
    pub interpreter: String,

    /// File the alias table is loaded from and saved to.
    #[serde(default)]
    pub alias_file: Option<PathBuf>,

    /// Print the full help table after the banner.
    #[serde(default = "default_true")]
    pub show_help_on_start: bool,
}

fn default_name() -> String {
    "rdsh".to_string()
}

fn default_prompt() -> String {
    ">> ".to_string()
}

fn default_exit_message() -> String {
    "[*] Exiting".to_string()
}

fn default_exit_keywords() -> Vec<String> {
    vec!["q".to_string(), "quit".to_string(), "exit".to_string()]
}

fn default_help_indent() -> usize {
    2
}

fn default_interpreter() -> String {
    "python3".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            prompt: default_prompt(),
            exit_message: default_exit_message(),
            exit_keywords: default_exit_keywords(),
            verbose_help: false,
            help_indent: default_help_indent(),
            interpreter: default_interpreter(),
            alias_file: None,
            show_help_on_start: true,
        }
    }
}

/// Startup banner settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BannerConfig {
    /// Print the banner when the shell starts.
    #[serde(default = "default_true")]
    pub show: bool,

    /// Decoration repeated above and below the identifier lines.
    #[serde(default = "default_decorator")]
    pub decorator: String,

    /// Number of times the decorator is repeated.
    #[serde(default = "default_decorator_length")]
    pub decorator_length: usize,

    /// Identifier lines (name, version, ...).
    #[serde(default = "default_banner_lines")]
    pub lines: Vec<String>,

    /// Static banner used instead of the generated one.
    #[serde(default)]
    pub custom: Option<String>,
}

fn default_decorator() -> String {
    "-=-".to_string()
}

fn default_decorator_length() -> usize {
    12
}

fn default_banner_lines() -> Vec<String> {
    vec![format!("rdsh v{}", env!("CARGO_PKG_VERSION"))]
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self {
            show: true,
            decorator: default_decorator(),
            decorator_length: default_decorator_length(),
            lines: default_banner_lines(),
            custom: None,
        }
    }
}

/// A group declared in the config file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupConfig {
    /// Group name.
    pub name: String,
    /// Help text.
    #[serde(default)]
    pub help: String,
}

/// A parser command declared in the config file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParserCommandConfig {
    /// Command name.
    pub name: String,
    /// Help text.
    #[serde(default)]
    pub help: String,
    /// Script passed to the interpreter.
    pub file: PathBuf,
    /// Group the command belongs to.
    #[serde(default)]
    pub group: Option<String>,
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("repl-dispatch")
            .join("config.toml")
    }

    /// Returns the default alias file path for the current platform.
    pub fn default_alias_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("repl-dispatch")
            .join("aliases.json")
    }

    /// Loads configuration from a TOML file. A missing file yields defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ShellError::config(format!("Failed to read config file: {e}")))?;

        let config = Self::parse_toml(&content, path)?;
        config.validate()?;
        Ok(config)
    }

    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            ShellError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    /// Checks settings that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.shell.exit_keywords.is_empty() {
            return Err(ShellError::config("exit_keywords must not be empty"));
        }
        if self
            .shell
            .exit_keywords
            .iter()
            .any(|k| k.trim().is_empty() || k.split_whitespace().count() != 1)
        {
            return Err(ShellError::config(
                "exit_keywords must be single non-blank words",
            ));
        }
        if let Some(keyword) = self
            .shell
            .exit_keywords
            .iter()
            .find(|k| [HELP, CLEAR, ALIAS].contains(&k.as_str()))
        {
            return Err(ShellError::config(format!(
                "exit keyword '{keyword}' is the name of a built-in command"
            )));
        }
        if self.shell.interpreter.trim().is_empty() {
            return Err(ShellError::config("interpreter must not be empty"));
        }
        Ok(())
    }
}
