//! Basic CLI E2E tests.
//!
//! Each test runs the built `emom` binary against its own data directory.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_emom"))
        .args(args)
        .env("EMOM_DATA_DIR", data_dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_cli_success(data_dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    stdout
}

#[test]
fn test_config_list_has_defaults() {
    let dir = TempDir::new().unwrap();
    let out = run_cli_success(dir.path(), &["config", "list"]);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["file"]["sync"]["upload"], true);
    assert_eq!(json["file"]["sync"]["history_days"], 60);
    assert_eq!(json["effective"]["interval_count"], 5);
    assert_eq!(json["effective"]["interval_secs"], 60);
    assert_eq!(json["effective"]["total_duration_secs"], 300);
    assert_eq!(json["setup_complete"], false);
    assert!(dir.path().join("config.toml").exists());
}

#[test]
fn test_config_set_and_get() {
    let dir = TempDir::new().unwrap();
    assert_eq!(run_cli_success(dir.path(), &["config", "get", "timer.interval_secs"]).trim(), "null");
    run_cli_success(dir.path(), &["config", "set", "timer.interval_secs", "45"]);
    assert_eq!(run_cli_success(dir.path(), &["config", "get", "timer.interval_secs"]).trim(), "45");

    let (_, stderr, code) = run_cli(dir.path(), &["config", "set", "timer.bogus", "1"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_setup_marks_complete() {
    let dir = TempDir::new().unwrap();
    run_cli_success(dir.path(), &["setup", "--rounds", "8", "--interval", "30"]);
    assert_eq!(run_cli_success(dir.path(), &["config", "get", "timer.setup_complete"]).trim(), "true");
    assert_eq!(run_cli_success(dir.path(), &["config", "get", "timer.interval_count"]).trim(), "8");

    let (_, _, code) = run_cli(dir.path(), &["setup", "--rounds", "0", "--interval", "30"]);
    assert_eq!(code, 1);
}

#[test]
fn test_empty_history_and_streak() {
    let dir = TempDir::new().unwrap();
    assert_eq!(run_cli_success(dir.path(), &["history", "--json"]).trim(), "[]");
    assert_eq!(run_cli_success(dir.path(), &["streak"]).trim(), "0");
}

#[test]
fn test_auth_lifecycle() {
    let dir = TempDir::new().unwrap();
    assert_eq!(run_cli_success(dir.path(), &["auth", "status"]).trim(), "not connected");
    run_cli_success(dir.path(), &["auth", "connect", "--token", "abc", "--expires-in", "3600"]);
    assert!(run_cli_success(dir.path(), &["auth", "status"]).starts_with("connected"));
    run_cli_success(dir.path(), &["auth", "disconnect"]);
    assert_eq!(run_cli_success(dir.path(), &["auth", "status"]).trim(), "not connected");
}

#[test]
fn test_short_run_is_recorded() {
    let dir = TempDir::new().unwrap();
    let (stdout, stderr, code) = run_cli(
        dir.path(),
        &["run", "--rounds", "1", "--interval", "1", "--no-countdown"],
    );
    assert_eq!(code, 0, "run failed: {stderr}");
    assert!(stdout.contains("Workout complete!"));
    assert!(stdout.contains("Streak: 1 day"));
    assert!(stderr.contains("emom setup"));

    let history: Vec<serde_json::Value> =
        serde_json::from_str(&run_cli_success(dir.path(), &["history", "--json"])).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["duration_secs"], 1);
    assert_eq!(history[0]["activity_type"], 115);
    assert_eq!(run_cli_success(dir.path(), &["streak", "--local"]).trim(), "1");
}
