//! Script-backed commands run through an external interpreter.
//!
//! Uses `sh` as the interpreter so the tests do not depend on Python.

#![cfg(unix)]

use repl_dispatch::commands::CommandOutput;
use repl_dispatch::config::{GroupConfig, ParserCommandConfig};
use repl_dispatch::{Config, Shell};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Writes a script that records its arguments, one per line, to `out`.
fn write_recording_script(dir: &Path, out: &Path) -> std::path::PathBuf {
    let script = dir.join("record.sh");
    fs::write(
        &script,
        format!("for arg in \"$@\"; do echo \"$arg\" >> '{}'; done\n", out.display()),
    )
    .unwrap();
    script
}

fn shell_with_script(script: &Path, group: Option<&str>) -> Shell<()> {
    let mut config = Config::default();
    config.shell.interpreter = "sh".to_string();
    if let Some(group) = group {
        config.groups.push(GroupConfig {
            name: group.to_string(),
            help: "scripts".to_string(),
        });
    }
    config.commands.push(ParserCommandConfig {
        name: "record".to_string(),
        help: "record arguments".to_string(),
        file: script.to_path_buf(),
        group: group.map(str::to_string),
    });
    Shell::new(config, ()).unwrap()
}

#[test]
fn test_parser_receives_split_arguments() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("args.txt");
    let script = write_recording_script(dir.path(), &out);

    let mut shell = shell_with_script(&script, None);
    let output = shell
        .execute_line(r#"record --name "John Doe" -v"#)
        .unwrap();

    assert_eq!(output, CommandOutput::Empty);
    assert_eq!(fs::read_to_string(&out).unwrap(), "--name\nJohn Doe\n-v\n");
}

#[test]
fn test_parser_without_arguments_runs() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("args.txt");
    let script = write_recording_script(dir.path(), &out);

    let mut shell = shell_with_script(&script, None);
    shell.execute_line("record").unwrap();

    assert!(!out.exists());
}

#[test]
fn test_parser_in_group() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("args.txt");
    let script = write_recording_script(dir.path(), &out);

    let mut shell = shell_with_script(&script, Some("tools"));
    shell.execute_line("tools record a b").unwrap();

    assert_eq!(fs::read_to_string(&out).unwrap(), "a\nb\n");
}

#[test]
fn test_parser_through_alias() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("args.txt");
    let script = write_recording_script(dir.path(), &out);

    let mut shell = shell_with_script(&script, None);
    shell.execute_line("alias add r record --fast").unwrap();
    shell.execute_line("r target").unwrap();

    assert_eq!(fs::read_to_string(&out).unwrap(), "--fast\ntarget\n");
}

#[test]
fn test_failing_script_does_not_stop_the_shell() {
    let dir = tempdir().unwrap();
    let script = dir.path().join("fail.sh");
    fs::write(&script, "exit 3\n").unwrap();

    let mut shell = shell_with_script(&script, None);
    assert_eq!(shell.execute_line("record").unwrap(), CommandOutput::Empty);
    assert!(shell.execute_line("q").unwrap().is_exit());
}
