//! Command-line argument parsing for rdsh.

use clap::Parser;
use repl_dispatch::Config;
use std::path::PathBuf;

/// Interactive command shell with groups, aliases and script commands.
#[derive(Parser, Debug)]
#[command(name = "rdsh")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, value_name = "PATH", env = "RDSH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Alias file path
    #[arg(long, value_name = "PATH")]
    pub aliases: Option<PathBuf>,

    /// Program used to run script-backed commands
    #[arg(long, value_name = "PROGRAM")]
    pub interpreter: Option<String>,

    /// Show the command type column in help tables
    #[arg(long)]
    pub verbose_help: bool,

    /// Do not print the startup banner
    #[arg(long)]
    pub no_banner: bool,

    /// Log to stderr instead of the log file
    #[arg(long)]
    pub log_stderr: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Applies flag overrides on top of the file configuration.
    ///
    /// Precedence for the alias file: `--aliases`, then `shell.alias_file`,
    /// then the platform data directory.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(path) = &self.aliases {
            config.shell.alias_file = Some(path.clone());
        }
        if config.shell.alias_file.is_none() {
            config.shell.alias_file = Some(Config::default_alias_path());
        }
        if let Some(interpreter) = &self.interpreter {
            config.shell.interpreter = interpreter.clone();
        }
        if self.verbose_help {
            config.shell.verbose_help = true;
        }
        if self.no_banner {
            config.banner.show = false;
        }
    }
}
