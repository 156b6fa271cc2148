//! Integration tests for the pidlock CLI

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo_bin;
use pidlock_core::PidLock;
use pidlock_testkit::temp_dir_in_workspace;
use predicates::prelude::*;
use std::process::{Command, Stdio};

#[test]
fn test_cli_help_lists_commands() {
    let mut cmd = Command::new(cargo_bin!(env!("CARGO_PKG_NAME")));
    let assert = cmd.arg("--help").assert();

    assert
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("hold"))
        .stdout(predicate::str::contains("demo"));
}

#[test]
fn test_demo_reports_only_correct_outcomes() {
    let temp = temp_dir_in_workspace();

    let mut cmd = Command::new(cargo_bin!(env!("CARGO_PKG_NAME")));
    let assert = cmd.arg("demo").arg("--dir").arg(temp.path()).assert();

    assert
        .success()
        .stdout(predicate::str::contains("Correct"))
        .stdout(predicate::str::contains("Incorrect").not());

    assert!(!temp.path().join("example.pid").exists());
    assert!(!temp.path().join("example2.pid").exists());
}

#[test]
fn test_demo_json_output() {
    let mut cmd = Command::new(cargo_bin!(env!("CARGO_PKG_NAME")));
    let output = cmd.arg("demo").arg("--json").output().unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["passed"], true);
    assert_eq!(json["files_removed"], true);

    let steps = json["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 8);
    assert_eq!(steps[0]["observed"], "acquired");
    assert_eq!(steps[1]["observed"], "contended");

    let handles: Vec<&str> = steps
        .iter()
        .map(|s| s["handle"].as_str().unwrap())
        .collect();
    assert_eq!(
        handles,
        ["lock1", "lock2", "lock3", "lock1", "lock3", "lock3", "lock1", "lock2"]
    );
}

#[test]
fn test_hold_acquires_and_cleans_up() {
    let temp = temp_dir_in_workspace();
    let lock_path = temp.path().join("hold.pid");

    let mut cmd = Command::new(cargo_bin!(env!("CARGO_PKG_NAME")));
    let assert = cmd
        .arg("hold")
        .arg(&lock_path)
        .arg("--seconds")
        .arg("0")
        .assert();

    assert
        .success()
        .stdout(predicate::str::contains("acquired"))
        .stdout(predicate::str::contains("released"));
    assert!(!lock_path.exists(), "Lock file should be removed on exit");
}

#[test]
fn test_hold_reads_path_from_env() {
    let temp = temp_dir_in_workspace();
    let lock_path = temp.path().join("env.pid");

    let mut cmd = Command::new(cargo_bin!(env!("CARGO_PKG_NAME")));
    let assert = cmd
        .env("PIDLOCK_FILE", &lock_path)
        .arg("hold")
        .arg("--seconds")
        .arg("0")
        .assert();

    assert
        .success()
        .stdout(predicate::str::contains("env.pid"));
}

#[test]
fn test_hold_until_stdin_closes() {
    let temp = temp_dir_in_workspace();
    let lock_path = temp.path().join("stdin.pid");

    let mut cmd = Command::new(cargo_bin!(env!("CARGO_PKG_NAME")));
    let assert = cmd
        .arg("hold")
        .arg(&lock_path)
        .stdin(Stdio::null())
        .assert();

    assert.success().stdout(predicate::str::contains("released"));
}

#[test]
fn test_hold_fails_when_contended() {
    let temp = temp_dir_in_workspace();
    let lock_path = temp.path().join("busy.pid");

    let mut holder = PidLock::new(&lock_path).unwrap();
    assert!(holder.try_lock().is_acquired());

    let mut cmd = Command::new(cargo_bin!(env!("CARGO_PKG_NAME")));
    let assert = cmd
        .arg("hold")
        .arg(&lock_path)
        .arg("--seconds")
        .arg("0")
        .assert();

    assert
        .failure()
        .stderr(predicate::str::contains("held by another instance"));

    // The failed hold still removes the path; the holder keeps its lock
    assert!(holder.is_held());
    assert!(!lock_path.exists());
}

#[test]
fn test_hold_fails_in_missing_directory() {
    let temp = temp_dir_in_workspace();
    let lock_path = temp.path().join("missing/dir/x.pid");

    let mut cmd = Command::new(cargo_bin!(env!("CARGO_PKG_NAME")));
    let assert = cmd
        .arg("hold")
        .arg(&lock_path)
        .arg("--seconds")
        .arg("0")
        .assert();

    assert
        .failure()
        .stderr(predicate::str::contains("LOCK_OPEN_FAILED"));
}
