//! The interactive shell.
//!
//! [`Shell`] owns the registry, the alias table and the handler context. It
//! can be driven line by line through [`Shell::execute_line`] or run as an
//! interactive loop with [`Shell::run`].

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{debug, info, warn};

use crate::commands::aliases::{AliasChange, AliasError, AliasTable};
use crate::commands::definitions::CommandDescriptor;
use crate::commands::dispatcher::Dispatcher;
use crate::commands::help::{
    render_alias_table, render_banner, render_filtered_help, render_full_help, render_group_help,
    suggestions_for, HelpStyle, ALIAS_USAGE,
};
use crate::commands::output::{CommandOutput, ControlAction};
use crate::commands::registry::CommandRegistry;
use crate::commands::router::{AliasAction, CommandRouter, HelpRequest, Resolution};
use crate::config::Config;
use crate::error::{Result, ShellError};
use crate::persistence::AliasStore;

/// Prefix for error lines printed by the interactive loop.
const ERROR_PREFIX: &str = "[!] ";

/// Command interpreter over a handler context `C`.
pub struct Shell<C> {
    config: Config,
    registry: CommandRegistry<C>,
    aliases: AliasTable,
    alias_store: Option<AliasStore>,
    dispatcher: Dispatcher,
    help_style: HelpStyle,
    context: C,
    started: bool,
}

impl<C> Shell<C> {
    /// Creates a shell and registers the groups and parser commands declared
    /// in `config`.
    pub fn new(config: Config, context: C) -> Result<Self> {
        config.validate()?;

        let exit_keywords = &config.shell.exit_keywords;
        let mut registry = CommandRegistry::new();
        for group in &config.groups {
            reserve_exit_keywords(exit_keywords, &group.name)?;
            registry.add_group(&group.name, &group.help)?;
        }
        for command in &config.commands {
            if command.group.is_none() {
                reserve_exit_keywords(exit_keywords, &command.name)?;
            }
            registry.register(
                CommandDescriptor::parser(&command.name, &command.help, &command.file),
                command.group.as_deref(),
            )?;
        }

        Ok(Self {
            alias_store: config.shell.alias_file.as_ref().map(AliasStore::new),
            dispatcher: Dispatcher::new(&config.shell.interpreter),
            help_style: HelpStyle::from_config(&config.shell),
            registry,
            aliases: AliasTable::new(),
            context,
            started: false,
            config,
        })
    }

    /// Registers a command at top level or inside `group`.
    pub fn register(&mut self, descriptor: CommandDescriptor<C>, group: Option<&str>) -> Result<()> {
        self.ensure_not_started(descriptor.name())?;
        if group.is_none() {
            reserve_exit_keywords(&self.config.shell.exit_keywords, descriptor.name())?;
        }
        self.registry.register(descriptor, group)
    }

    /// Creates an empty group.
    pub fn add_group(&mut self, name: &str, help: &str) -> Result<()> {
        self.ensure_not_started(name)?;
        reserve_exit_keywords(&self.config.shell.exit_keywords, name)?;
        self.registry.add_group(name, help)
    }

    pub fn registry(&self) -> &CommandRegistry<C> {
        &self.registry
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    /// Consumes the shell, returning the handler context.
    pub fn into_context(self) -> C {
        self.context
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Installs the built-ins and loads the alias file.
    ///
    /// Called by [`Shell::run`] and on the first [`Shell::execute_line`];
    /// later calls do nothing.
    pub fn start(&mut self) -> Result<()> {
        if self.started {
            return Ok(());
        }

        self.registry
            .install_builtins(&self.config.shell.exit_keywords, &self.config.shell.name)?;

        if let Some(store) = &self.alias_store {
            self.aliases = AliasTable::from_entries(store.load()?);
        }

        self.started = true;
        info!(
            commands = self.registry.len(),
            aliases = self.aliases.len(),
            "Shell started"
        );
        Ok(())
    }

    /// Resolves and executes one input line.
    ///
    /// Unknown commands, bad arguments and alias mistakes come back as
    /// output. Handler errors and persistence failures on startup are
    /// returned as errors.
    pub fn execute_line(&mut self, input: &str) -> Result<CommandOutput> {
        self.start()?;

        let router = CommandRouter::new(
            &self.registry,
            &self.aliases,
            &self.config.shell.exit_keywords,
        );

        match router.resolve(input) {
            Resolution::Empty => Ok(CommandOutput::Empty),
            Resolution::Exit => Ok(self.exit()),
            Resolution::Clear => Ok(CommandOutput::clear_screen()),
            Resolution::Help(request) => Ok(self.help(&request)),
            Resolution::Alias(action) => Ok(edit_aliases(
                &mut self.aliases,
                &self.registry,
                &self.config.shell.exit_keywords,
                self.help_style,
                action,
            )),
            Resolution::Dispatch(decision) => self.dispatcher.dispatch(decision, &mut self.context),
            Resolution::Failure(failure) => {
                debug!(%failure, "Could not resolve input");
                let message = CommandOutput::error(failure.to_string());
                Ok(match suggestions_for(&failure, &self.registry) {
                    Some(suggestions) => {
                        CommandOutput::multiple(vec![message, CommandOutput::info(suggestions)])
                    }
                    None => message,
                })
            }
        }
    }

    /// Writes the alias table to the alias file, if one is configured.
    pub fn save_aliases(&self) -> Result<()> {
        match &self.alias_store {
            Some(store) => store.save(self.aliases.entries()),
            None => Ok(()),
        }
    }

    /// Runs the interactive loop until an exit keyword or end of input.
    pub fn run(&mut self) -> Result<()> {
        self.start()?;

        let mut editor = DefaultEditor::new()
            .map_err(|e| ShellError::terminal(format!("Failed to initialize line editor: {e}")))?;

        let mut stdout = io::stdout();
        if self.config.banner.show {
            self.write_info(&mut stdout, &render_banner(&self.config.banner))?;
        }
        if self.config.shell.show_help_on_start {
            self.write_info(&mut stdout, &render_full_help(&self.registry, self.help_style))?;
        }

        loop {
            match editor.readline(&self.config.shell.prompt) {
                Ok(line) => {
                    let output = self.execute_line(&line)?;
                    self.render(&mut stdout, &output)?;
                    if output.is_exit() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    debug!("Input interrupted");
                }
                Err(ReadlineError::Eof) => {
                    debug!("End of input");
                    let output = self.exit();
                    self.render(&mut stdout, &output)?;
                    break;
                }
                Err(e) => {
                    return Err(ShellError::terminal(format!("Failed to read input: {e}")));
                }
            }
        }

        info!("Shell stopped");
        Ok(())
    }

    /// Prints an output to `out`.
    pub fn render<W: Write>(&self, out: &mut W, output: &CommandOutput) -> Result<()> {
        write_output(out, output, &self.config.shell.exit_message)
            .map_err(|e| ShellError::terminal(format!("Failed to write output: {e}")))
    }

    fn write_info<W: Write>(&self, out: &mut W, text: &str) -> Result<()> {
        self.render(out, &CommandOutput::info(text))
    }

    fn ensure_not_started(&self, name: &str) -> Result<()> {
        if self.started {
            return Err(ShellError::config(format!(
                "Cannot register '{name}' after the shell has started"
            )));
        }
        Ok(())
    }

    /// Saves aliases and returns the exit action. A failed save is reported
    /// but does not keep the shell running.
    fn exit(&self) -> CommandOutput {
        match self.save_aliases() {
            Ok(()) => CommandOutput::exit(),
            Err(e) => {
                warn!("{e}");
                CommandOutput::multiple(vec![
                    CommandOutput::error(format!("Failed to save aliases: {e}")),
                    CommandOutput::exit(),
                ])
            }
        }
    }

    fn help(&self, request: &HelpRequest) -> CommandOutput {
        match request {
            HelpRequest::Full => {
                CommandOutput::info(render_full_help(&self.registry, self.help_style))
            }
            HelpRequest::Filtered(prefix) => CommandOutput::info(render_filtered_help(
                &self.registry,
                prefix,
                self.help_style,
            )),
            HelpRequest::Group(name) => match self.registry.group(name) {
                Some(group) => {
                    CommandOutput::info(render_group_help(name, group, self.help_style))
                }
                None => CommandOutput::error(ShellError::GroupNotFound(name.clone()).to_string()),
            },
        }
    }
}

/// Exit keywords are matched before any lookup, so a top-level command or
/// group with one of those names could never run.
fn reserve_exit_keywords(exit_keywords: &[String], name: &str) -> Result<()> {
    if exit_keywords.iter().any(|k| k == name) {
        return Err(ShellError::DuplicateName(name.to_string()));
    }
    Ok(())
}

/// Applies an `alias` sub-command and describes the result.
fn edit_aliases<C>(
    aliases: &mut AliasTable,
    registry: &CommandRegistry<C>,
    exit_keywords: &[String],
    style: HelpStyle,
    action: AliasAction,
) -> CommandOutput {
    let result = match action {
        AliasAction::Add { name, expansion } => {
            add_alias(aliases, registry, exit_keywords, &name, &expansion)
        }
        AliasAction::Remove { name } => aliases
            .remove(&name)
            .map(|_| format!("Alias '{name}' removed")),
        AliasAction::View => Ok(render_alias_table(aliases, style)),
        AliasAction::Usage => Ok(ALIAS_USAGE.to_string()),
    };

    match result {
        Ok(message) => CommandOutput::info(message),
        Err(e) => {
            debug!(error = %e, "Alias change refused");
            CommandOutput::error(e.to_string())
        }
    }
}

fn add_alias<C>(
    aliases: &mut AliasTable,
    registry: &CommandRegistry<C>,
    exit_keywords: &[String],
    name: &str,
    expansion: &str,
) -> std::result::Result<String, AliasError> {
    let change = aliases.add(name, expansion, registry, exit_keywords)?;
    info!(alias = name, expansion, ?change, "Alias changed");
    Ok(match change {
        AliasChange::Added => format!("Alias '{name}' added"),
        AliasChange::Updated => format!("Alias '{name}' updated"),
    })
}

/// Writes an output to `out`. Errors get the `[!] ` prefix, the exit action
/// prints `exit_message`, and clearing uses terminal escape sequences.
pub fn write_output<W: Write>(out: &mut W, output: &CommandOutput, exit_message: &str) -> io::Result<()> {
    match output {
        CommandOutput::Empty => Ok(()),
        CommandOutput::Info(text) => writeln!(out, "{text}"),
        CommandOutput::Error(text) => writeln!(out, "{ERROR_PREFIX}{text}"),
        CommandOutput::Control(ControlAction::Exit) => writeln!(out, "{exit_message}"),
        CommandOutput::Control(ControlAction::ClearScreen) => {
            execute!(out, Clear(ClearType::All), MoveTo(0, 0))
        }
        CommandOutput::Multiple(outputs) => {
            for output in outputs {
                write_output(out, output, exit_message)?;
            }
            Ok(())
        }
    }
}
