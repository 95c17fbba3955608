//! Runs the rdsh binary with piped input.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use tempfile::tempdir;

/// Runs rdsh with `input` on stdin. Returns (exit code, stdout).
fn run_rdsh(dir: &Path, input: &str) -> (i32, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_rdsh"))
        .args(["--log-stderr", "--no-banner", "--config"])
        .arg(dir.join("config.toml"))
        .arg("--aliases")
        .arg(dir.join("aliases.json"))
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start rdsh");

    // The child may exit before reading stdin (e.g. on a config error).
    if let Err(e) = child.stdin.take().unwrap().write_all(input.as_bytes()) {
        assert_eq!(e.kind(), std::io::ErrorKind::BrokenPipe, "stdin write failed: {e}");
    }

    let output = child.wait_with_output().unwrap();
    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
    )
}

#[test]
fn test_echo_and_exit() {
    let dir = tempdir().unwrap();
    let (code, stdout) = run_rdsh(dir.path(), "echo hello there\nq\n");

    assert_eq!(code, 0);
    assert!(stdout.contains("hello there"));
    assert!(stdout.contains("[*] Exiting"));
}

#[test]
fn test_end_of_input_saves_aliases() {
    let dir = tempdir().unwrap();
    let (code, _) = run_rdsh(dir.path(), "alias add v version\n");
    assert_eq!(code, 0);

    let saved = std::fs::read_to_string(dir.path().join("aliases.json")).unwrap();
    assert!(saved.contains("\"v\": \"version\""));
}

#[test]
fn test_unknown_command_is_reported() {
    let dir = tempdir().unwrap();
    let (code, stdout) = run_rdsh(dir.path(), "ver\nq\n");

    assert_eq!(code, 0);
    assert!(stdout.contains("[!] Unknown command: ver"));
    assert!(stdout.contains("version"));
}

#[test]
fn test_invalid_config_exits_with_error() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("config.toml"), "[shell]\nexit_keywords = []\n").unwrap();

    let (code, _) = run_rdsh(dir.path(), "q\n");
    assert_eq!(code, 1);
}
