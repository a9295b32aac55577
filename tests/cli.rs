//! CLI-level tests for the config-only subcommands.
//!
//! `send` and `check` need a tracker to talk to, so they are covered at the
//! library level with a test double; here we exercise the file-handling
//! commands end to end.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn handoff(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("handoff").unwrap();
    cmd.current_dir(dir.path());
    cmd
}

#[test]
fn test_init_writes_a_loadable_config() {
    let dir = TempDir::new().unwrap();

    handoff(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created handoff.toml"));

    handoff(&dir)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn test_init_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();

    handoff(&dir).arg("init").assert().success();

    handoff(&dir)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_validate_reports_a_missing_file() {
    let dir = TempDir::new().unwrap();

    handoff(&dir)
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
fn test_validate_reports_a_malformed_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("handoff.toml"), "[send\nnot toml").unwrap();

    handoff(&dir)
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
fn test_validate_honors_the_config_flag() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("custom.toml"),
        r#"
        [tracker]
        url = "https://tracker.example.com"
        username = "ci"
        password = "secret"
        "#,
    )
    .unwrap();

    handoff(&dir)
        .args(["--config", "custom.toml", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tracker.example.com"));
}
