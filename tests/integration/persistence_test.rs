//! Alias persistence across shell sessions.

use repl_dispatch::commands::CommandOutput;
use repl_dispatch::persistence::AliasStore;
use repl_dispatch::{CommandDescriptor, Config, Shell};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn shell_with_alias_file(path: &Path) -> Shell<Vec<String>> {
    let mut config = Config::default();
    config.shell.alias_file = Some(path.to_path_buf());

    let mut shell = Shell::new(config, Vec::new()).unwrap();
    shell
        .register(
            CommandDescriptor::free("say", "print text", |text: &str, out: &mut Vec<String>| {
                out.push(text.to_string());
                Ok(())
            }),
            None,
        )
        .unwrap();
    shell
}

#[test]
fn test_aliases_survive_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("aliases.json");

    let mut first = shell_with_alias_file(&path);
    first.execute_line("alias add hi say hello").unwrap();
    first.execute_line("alias add bye say goodbye").unwrap();
    assert!(first.execute_line("q").unwrap().is_exit());

    let mut second = shell_with_alias_file(&path);
    second.execute_line("hi").unwrap();
    second.execute_line("bye now").unwrap();
    assert_eq!(second.context(), &vec!["hello", "goodbye now"]);

    let names: Vec<&str> = second.aliases().iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["hi", "bye"]);
}

#[test]
fn test_aliases_are_saved_only_on_exit() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("aliases.json");

    let mut shell = shell_with_alias_file(&path);
    shell.execute_line("alias add hi say hello").unwrap();
    assert!(!path.exists());

    shell.execute_line("exit").unwrap();
    let stored = AliasStore::new(&path).load().unwrap();
    assert_eq!(stored.get("hi").map(String::as_str), Some("say hello"));
}

#[test]
fn test_save_load_is_idempotent() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("aliases.json");

    let mut shell = shell_with_alias_file(&path);
    shell.execute_line("alias add hi say hello").unwrap();
    shell.execute_line("q").unwrap();
    let first = fs::read_to_string(&path).unwrap();

    let mut shell = shell_with_alias_file(&path);
    shell.execute_line("q").unwrap();
    let second = fs::read_to_string(&path).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_corrupt_alias_file_starts_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("aliases.json");
    fs::write(&path, "{ broken").unwrap();

    let mut shell = shell_with_alias_file(&path);
    let output = shell.execute_line("alias view").unwrap();

    assert_eq!(output, CommandOutput::info("No aliases defined"));
    assert!(dir.path().join("aliases.json.bak").exists());
}

#[test]
fn test_save_failure_still_exits() {
    let dir = tempdir().unwrap();
    // The alias file's parent is a regular file, so the save cannot succeed
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "").unwrap();

    let mut config = Config::default();
    config.shell.alias_file = Some(blocker.join("aliases.json"));
    let mut shell = Shell::new(config, ()).unwrap();

    let output = shell.execute_line("q").unwrap();
    assert!(output.is_exit());
    assert!(output.text().contains("Failed to save aliases"));
}
