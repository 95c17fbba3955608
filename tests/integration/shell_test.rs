//! Line execution through the public `Shell` API.

use pretty_assertions::assert_eq;
use repl_dispatch::commands::CommandOutput;
use repl_dispatch::config::ParserCommandConfig;
use repl_dispatch::{CommandDescriptor, Config, Shell, ShellError};

/// Context that records every handler call.
#[derive(Default)]
struct Recorder {
    calls: Vec<String>,
}

impl Recorder {
    fn push(&mut self, call: impl Into<String>) {
        self.calls.push(call.into());
    }
}

fn shell() -> Shell<Recorder> {
    let mut shell = Shell::new(Config::default(), Recorder::default()).unwrap();

    shell
        .register(
            CommandDescriptor::single("status", "show status", |ctx: &mut Recorder| {
                ctx.push("status");
                Ok(())
            }),
            None,
        )
        .unwrap();
    shell
        .register(
            CommandDescriptor::free("say", "print text", |text: &str, ctx: &mut Recorder| {
                ctx.push(format!("say:{text}"));
                Ok(())
            }),
            None,
        )
        .unwrap();
    shell
        .register(
            CommandDescriptor::strict(
                "proto",
                "pick protocol",
                ["tcp", "udp"],
                |opt: &str, ctx: &mut Recorder| {
                    ctx.push(format!("proto:{opt}"));
                    Ok(())
                },
            ),
            None,
        )
        .unwrap();
    shell.add_group("net", "network tools").unwrap();
    shell
        .register(
            CommandDescriptor::free("ping", "ping a host", |host: &str, ctx: &mut Recorder| {
                ctx.push(format!("net ping:{host}"));
                Ok(())
            }),
            Some("net"),
        )
        .unwrap();
    shell
        .register(
            CommandDescriptor::single("status", "link status", |ctx: &mut Recorder| {
                ctx.push("net status");
                Ok(())
            }),
            Some("net"),
        )
        .unwrap();
    shell
        .register(
            CommandDescriptor::single("boom", "always fails", |_: &mut Recorder| {
                Err(anyhow::anyhow!("disk on fire"))
            }),
            None,
        )
        .unwrap();

    shell
}

fn first_words(text: &str) -> Vec<String> {
    text.lines()
        .skip(2)
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

#[test]
fn test_each_calling_convention() {
    let mut shell = shell();

    shell.execute_line("status extra words").unwrap();
    shell.execute_line("say hello   world").unwrap();
    shell.execute_line("proto udp").unwrap();

    assert_eq!(
        shell.context().calls,
        vec!["status", "say:hello   world", "proto:udp"]
    );
}

#[test]
fn test_group_members_are_scoped() {
    let mut shell = shell();

    shell.execute_line("status").unwrap();
    shell.execute_line("net status").unwrap();
    shell.execute_line("net ping 10.0.0.1").unwrap();

    assert_eq!(
        shell.context().calls,
        vec!["status", "net status", "net ping:10.0.0.1"]
    );
}

#[test]
fn test_group_alone_shows_group_help() {
    let mut shell = shell();
    let CommandOutput::Info(text) = shell.execute_line("net").unwrap() else {
        panic!("Expected Info");
    };
    assert!(text.starts_with("net commands:\n"));
    assert!(text.contains("ping a host"));
    assert!(shell.context().calls.is_empty());
}

#[test]
fn test_unknown_group_member_suggests_members() {
    let mut shell = shell();
    let output = shell.execute_line("net pi").unwrap();
    let text = output.text();
    assert!(text.contains("Unknown command 'pi' in group 'net'"));
    assert!(text.contains("ping"));
    assert!(!text.contains("proto"));
}

#[test]
fn test_strict_rejects_bad_input() {
    let mut shell = shell();

    let output = shell.execute_line("proto icmp").unwrap();
    assert!(output.text().contains("Invalid option 'icmp' for 'proto'"));

    let output = shell.execute_line("proto tcp udp").unwrap();
    assert_eq!(
        output,
        CommandOutput::error("'proto' takes exactly one argument")
    );

    let output = shell.execute_line("proto").unwrap();
    assert_eq!(output, CommandOutput::error("Argument required for 'proto'"));

    assert!(shell.context().calls.is_empty());
}

#[test]
fn test_free_requires_argument() {
    let mut shell = shell();
    let output = shell.execute_line("net ping").unwrap();
    assert_eq!(
        output,
        CommandOutput::error("Argument required for 'net ping'")
    );
}

#[test]
fn test_alias_expands_with_trailing_arguments() {
    let mut shell = shell();

    shell.execute_line("alias add p net ping -c 3").unwrap();
    shell.execute_line("p   host").unwrap();

    assert_eq!(shell.context().calls, vec!["net ping:-c 3   host"]);
}

#[test]
fn test_alias_to_alias_is_refused_on_add() {
    let mut shell = shell();
    shell.execute_line("alias add s say hi").unwrap();

    // Adding an alias whose head is an alias is rejected up front
    let output = shell.execute_line("alias add t s").unwrap();
    assert_eq!(output, CommandOutput::error("Command 's' does not exist"));
}

#[test]
fn test_alias_cannot_shadow_command() {
    let mut shell = shell();
    let output = shell.execute_line("alias add net say hi").unwrap();
    assert!(matches!(output, CommandOutput::Error(msg) if msg.contains("already a command")));
}

#[test]
fn test_alias_view_lists_in_insertion_order() {
    let mut shell = shell();
    shell.execute_line("alias add zz status").unwrap();
    shell.execute_line("alias add aa say hi").unwrap();

    let CommandOutput::Info(table) = shell.execute_line("alias view").unwrap() else {
        panic!("Expected Info");
    };
    assert_eq!(first_words(&table), vec!["zz", "aa"]);
}

#[test]
fn test_help_lists_builtins_last() {
    let mut shell = shell();
    let CommandOutput::Info(table) = shell.execute_line("help").unwrap() else {
        panic!("Expected Info");
    };
    assert_eq!(
        first_words(&table),
        vec!["status", "say", "proto", "net", "boom", "clear", "help", "alias", "q"]
    );
    assert!(table.contains("exit rdsh"));
}

#[test]
fn test_help_filters_by_prefix() {
    let mut shell = shell();
    let CommandOutput::Info(table) = shell.execute_line("help s").unwrap() else {
        panic!("Expected Info");
    };
    assert_eq!(first_words(&table), vec!["status", "say"]);

    let output = shell.execute_line("help zzz").unwrap();
    assert_eq!(
        output,
        CommandOutput::info("No command(s) found matching 'zzz'")
    );
}

#[test]
fn test_unknown_command_suggests_prefix_matches() {
    let mut shell = shell();
    let text = shell.execute_line("st").unwrap().text();
    assert!(text.starts_with("Unknown command: st\n"));
    assert!(text.contains("status"));

    let text = shell.execute_line("xyz").unwrap().text();
    assert!(text.contains("No command(s) found matching 'xyz'"));
}

#[test]
fn test_matching_is_case_sensitive() {
    let mut shell = shell();
    let text = shell.execute_line("STATUS").unwrap().text();
    assert!(text.contains("Unknown command: STATUS"));
}

#[test]
fn test_handler_error_propagates() {
    let mut shell = shell();
    let err = shell.execute_line("boom").unwrap_err();
    assert!(matches!(&err, ShellError::Handler { command, .. } if command == "boom"));
    assert!(err.to_string().contains("disk on fire"));
}

#[test]
fn test_clear_and_exit() {
    let mut shell = shell();
    assert_eq!(
        shell.execute_line("clear").unwrap(),
        CommandOutput::clear_screen()
    );
    assert!(shell.execute_line("  quit  ").unwrap().is_exit());
}

#[test]
fn test_duplicate_registration_fails() {
    let mut shell = shell();
    let err = shell
        .register(CommandDescriptor::single("say", "", |_: &mut Recorder| Ok(())), None)
        .unwrap_err();
    assert!(matches!(err, ShellError::DuplicateName(name) if name == "say"));
}

#[test]
fn test_exit_keyword_names_are_reserved() {
    let mut shell = shell();

    let err = shell
        .register(CommandDescriptor::single("exit", "", |_: &mut Recorder| Ok(())), None)
        .unwrap_err();
    assert!(matches!(err, ShellError::DuplicateName(name) if name == "exit"));

    let err = shell.add_group("quit", "").unwrap_err();
    assert!(matches!(err, ShellError::DuplicateName(name) if name == "quit"));

    assert!(shell.execute_line("exit").unwrap().is_exit());
    assert!(shell.context().calls.is_empty());
}

#[test]
fn test_exit_keyword_is_allowed_inside_group() {
    let mut shell = shell();
    shell
        .register(
            CommandDescriptor::single("exit", "leave the link", |ctx: &mut Recorder| {
                ctx.push("net exit");
                Ok(())
            }),
            Some("net"),
        )
        .unwrap();

    assert!(!shell.execute_line("net exit").unwrap().is_exit());
    assert_eq!(shell.context().calls, vec!["net exit"]);
}

#[test]
fn test_config_command_named_after_exit_keyword_fails() {
    let mut config = Config::default();
    config.commands.push(ParserCommandConfig {
        name: "quit".to_string(),
        help: String::new(),
        file: "quit.py".into(),
        group: None,
    });

    let err = Shell::new(config, ()).err().unwrap();
    assert!(matches!(err, ShellError::DuplicateName(name) if name == "quit"));
}

#[test]
fn test_alias_may_target_any_exit_keyword() {
    let mut shell = shell();
    assert_eq!(
        shell.execute_line("alias add bye quit").unwrap(),
        CommandOutput::info("Alias 'bye' added")
    );
    assert!(shell.execute_line("bye").unwrap().is_exit());
}

#[test]
fn test_registering_builtin_name_fails_on_start() {
    let mut shell = shell();
    shell
        .register(CommandDescriptor::single("help", "", |_: &mut Recorder| Ok(())), None)
        .unwrap();
    let err = shell.start().unwrap_err();
    assert!(matches!(err, ShellError::DuplicateName(name) if name == "help"));
}
