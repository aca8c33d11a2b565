//! End-to-end CLI tests.
//!
//! These drive the compiled binary with an isolated `TETHER_HOME`. The
//! configured API base points at a closed local port, so every request
//! fails with a connection error, which is exactly the offline condition the
//! queue exists for.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A base URL that refuses connections immediately.
const UNREACHABLE_BASE: &str = "http://127.0.0.1:9";

fn tether(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tether").unwrap();
    cmd.env("TETHER_HOME", home.path());
    cmd.env("NO_COLOR", "1");
    cmd
}

fn write_config(home: &TempDir) {
    std::fs::write(
        home.path().join("config.yaml"),
        format!(
            "api:\n  base_url: {UNREACHABLE_BASE}\n  timeout_secs: 2\nsync:\n  retry_delay_ms: 10\n"
        ),
    )
    .unwrap();
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    tether(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("tasks"))
        .stdout(predicate::str::contains("sync"))
        .stdout(predicate::str::contains("offline"));
}

#[test]
fn test_version() {
    let home = TempDir::new().unwrap();
    tether(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tether"));
}

#[test]
fn test_sync_status_starts_empty() {
    let home = TempDir::new().unwrap();
    write_config(&home);

    tether(&home)
        .args(["sync", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pending:       0"));
}

#[test]
fn test_offline_task_add_is_queued_and_persisted() {
    let home = TempDir::new().unwrap();
    write_config(&home);

    // The mutation fails to connect, so it lands in the queue and exits 0
    tether(&home)
        .args(["tasks", "add", "Water the plants"])
        .assert()
        .success()
        .stdout(predicate::str::contains("queued as req-"));

    // A separate process sees the persisted entry
    tether(&home)
        .args(["sync", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pending:       1"))
        .stdout(predicate::str::contains("POST /tasks"));
}

#[test]
fn test_offline_read_fails_and_is_not_queued() {
    let home = TempDir::new().unwrap();
    write_config(&home);

    tether(&home)
        .args(["tasks", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Network error"));

    tether(&home)
        .args(["sync", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pending:       0"));
}

#[test]
fn test_sync_now_reports_unreachable_and_keeps_queue() {
    let home = TempDir::new().unwrap();
    write_config(&home);

    tether(&home)
        .args(["tasks", "add", "Call mom"])
        .assert()
        .success();

    tether(&home)
        .args(["sync", "now"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Service unreachable"));

    tether(&home)
        .args(["sync", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pending:       1"));
}

#[test]
fn test_sync_remove_cancels_queued_request() {
    let home = TempDir::new().unwrap();
    write_config(&home);

    let output = tether(&home)
        .args(["--output", "json", "tasks", "add", "Buy milk"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["queued"], serde_json::Value::Bool(true));
    let id = body["request_id"].as_str().unwrap().to_string();

    tether(&home)
        .args(["sync", "remove", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed"));

    tether(&home)
        .args(["sync", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pending:       0"));
}

#[test]
fn test_sync_clear_requires_force() {
    let home = TempDir::new().unwrap();
    write_config(&home);

    tether(&home)
        .args(["tasks", "add", "A"])
        .assert()
        .success();
    tether(&home)
        .args(["tasks", "add", "B"])
        .assert()
        .success();

    // Without --force the queue is untouched
    tether(&home)
        .args(["sync", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"));
    tether(&home)
        .args(["sync", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pending:       2"));

    tether(&home)
        .args(["sync", "clear", "--force"])
        .assert()
        .success();
    tether(&home)
        .args(["sync", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pending:       0"));
}

#[test]
fn test_logout_abandons_queue_and_token() {
    let home = TempDir::new().unwrap();
    write_config(&home);

    tether(&home)
        .args(["auth", "login", "tok-123"])
        .assert()
        .success();

    tether(&home)
        .args(["tasks", "add", "Secret errand"])
        .assert()
        .success();

    tether(&home)
        .args(["auth", "logout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("abandoned"));

    tether(&home)
        .args(["sync", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pending:       0"));

    let config = std::fs::read_to_string(home.path().join("config.yaml")).unwrap();
    assert!(!config.contains("tok-123"));
}

#[test]
fn test_completions_generate() {
    let home = TempDir::new().unwrap();
    tether(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tether"));
}

#[test]
fn test_json_queue_status_shape() {
    let home = TempDir::new().unwrap();
    write_config(&home);

    tether(&home)
        .args(["tasks", "add", "Water the plants"])
        .assert()
        .success();

    let output = tether(&home)
        .args(["--output", "json", "sync", "status"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["is_online"], serde_json::Value::Bool(false));
    assert_eq!(body["queue_length"], serde_json::json!(1));
    assert_eq!(body["queue"][0]["method"], serde_json::json!("POST"));
    assert_eq!(body["queue"][0]["url"], serde_json::json!("/tasks"));
}
