//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary home directory.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_dosekeep"))
        .args(args)
        .env("HOME", home)
        .env_remove("DOSEKEEP_ENV")
        .env_remove("DOSEKEEP_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_ok(home: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(home, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    stdout
}

#[test]
fn test_goal_add_and_list() {
    let home = tempfile::tempdir().unwrap();
    run_ok(home.path(), &["goal", "add", "Vitamin D", "--at", "08:00", "--at", "20:00"]);

    let out = run_ok(home.path(), &["goal", "list", "--json"]);
    let goals: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(goals.as_array().unwrap().len(), 1);
    assert_eq!(goals[0]["name"], "Vitamin D");
    assert_eq!(goals[0]["target_times"].as_array().unwrap().len(), 2);
}

#[test]
fn test_duplicate_goal_rejected() {
    let home = tempfile::tempdir().unwrap();
    run_ok(home.path(), &["goal", "add", "Iron", "--at", "09:00"]);
    let (_, stderr, code) = run_cli(home.path(), &["goal", "add", "iron", "--at", "10:00"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_schedule_twice_keeps_one_trigger_per_time() {
    let home = tempfile::tempdir().unwrap();
    run_ok(home.path(), &["goal", "add", "Daily Med", "--at", "08:00", "--at", "14:00"]);
    run_ok(home.path(), &["remind", "schedule", "Daily Med"]);
    run_ok(home.path(), &["remind", "schedule", "--all"]);

    let out = run_ok(home.path(), &["remind", "pending", "--json"]);
    let pending: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(pending.as_array().unwrap().len(), 2);
}

#[test]
fn test_schedule_denied_when_notifications_disabled() {
    let home = tempfile::tempdir().unwrap();
    run_ok(home.path(), &["goal", "add", "Daily Med", "--at", "08:00"]);
    run_ok(home.path(), &["config", "set", "notifications.enabled", "false"]);

    let (_, stderr, code) = run_cli(home.path(), &["remind", "schedule", "Daily Med"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));

    let out = run_ok(home.path(), &["remind", "pending"]);
    assert!(out.contains("No pending reminders."));
}

#[test]
fn test_check_suppresses_after_intake() {
    let home = tempfile::tempdir().unwrap();
    run_ok(
        home.path(),
        &["goal", "add", "Daily Med", "--at", "14:00", "--on", "2024-03-05"],
    );

    let args = [
        "remind", "check", "Daily Med", "--at", "2024-03-05 14:00", "--now", "2024-03-05 14:00",
    ];
    assert_eq!(run_ok(home.path(), &args).trim(), "deliver");

    run_ok(home.path(), &["intake", "log", "daily med", "--at", "2024-03-05 13:00"]);
    assert_eq!(run_ok(home.path(), &args).trim(), "suppress");
}

#[test]
fn test_supersede_and_remove() {
    let home = tempfile::tempdir().unwrap();
    run_ok(home.path(), &["goal", "add", "Daily Med", "--at", "08:00", "--at", "14:00"]);
    run_ok(home.path(), &["remind", "schedule", "Daily Med"]);

    let out = run_ok(home.path(), &["remind", "supersede", "Daily Med", "--at", "14:00"]);
    assert!(out.contains("-8-0"));

    run_ok(home.path(), &["goal", "remove", "Daily Med"]);
    let out = run_ok(home.path(), &["remind", "pending"]);
    assert!(out.contains("No pending reminders."));
}

#[test]
fn test_config_get_unknown_key_fails() {
    let home = tempfile::tempdir().unwrap();
    assert_eq!(run_ok(home.path(), &["config", "get", "store.goals"]).trim(), "goals.toml");
    let (_, _, code) = run_cli(home.path(), &["config", "get", "no.such.key"]);
    assert_eq!(code, 1);
}

#[test]
fn test_intake_list_filters_name_ignoring_case() {
    let home = tempfile::tempdir().unwrap();
    run_ok(home.path(), &["intake", "log", "IBUPROFÈNE", "--at", "2024-03-05 13:00"]);
    run_ok(home.path(), &["intake", "log", "Iron", "--at", "2024-03-05 13:05"]);

    let out = run_ok(home.path(), &["intake", "list", "--name", "ibuprofène", "--json"]);
    let entries: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(entries.as_array().unwrap().len(), 1);
    assert_eq!(entries[0]["name"], "IBUPROFÈNE");
}
