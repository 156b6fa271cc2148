//! Process-level PID lock tests
//!
//! The holder runs in a child process (examples/lock_holder.rs), so these
//! tests check the OS lock between processes rather than between handles
//! of one process.

use pidlock_core::lock::PidLock;
use pidlock_testkit::{example_bin, read_pid_file, temp_dir_in_workspace};
use std::io::{BufRead, BufReader};
use std::process::{Child, ChildStdout, Command, Stdio};

/// Spawns `lock_holder <path> --wait` and returns it with its first status line.
fn spawn_holder(lock_path: &std::path::Path) -> (Child, BufReader<ChildStdout>, String) {
    let mut child = Command::new(example_bin("lock_holder"))
        .arg(lock_path)
        .arg("--wait")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to execute lock_holder");

    let stdout = child.stdout.take().expect("stdout should be piped");
    let mut reader = BufReader::new(stdout);
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .expect("Failed to read holder status");

    (child, reader, line.trim().to_string())
}

#[test]
fn test_holder_process_records_its_pid() {
    let temp = temp_dir_in_workspace();
    let lock_path = temp.path().join("daemon.pid");

    let (mut child, _reader, status) = spawn_holder(&lock_path);

    let expected = format!("acquired {}", child.id());
    assert_eq!(status, expected);
    assert_eq!(read_pid_file(&lock_path), Some(child.id()));

    // Closing stdin lets the holder exit and clean up
    drop(child.stdin.take());
    assert!(child.wait().unwrap().success());
    assert!(!lock_path.exists(), "Holder should remove the lock file");
}

#[test]
fn test_second_process_sees_contention() {
    let temp = temp_dir_in_workspace();
    let lock_path = temp.path().join("single.pid");

    let (mut holder, _reader, status) = spawn_holder(&lock_path);
    assert!(status.starts_with("acquired "), "Got: {}", status);

    let probe = Command::new(example_bin("lock_holder"))
        .arg(&lock_path)
        .output()
        .expect("Failed to execute lock_holder");

    assert!(probe.status.success());
    assert_eq!(String::from_utf8_lossy(&probe.stdout).trim(), "contended");

    drop(holder.stdin.take());
    assert!(holder.wait().unwrap().success());
}

#[test]
fn test_lock_released_when_holder_exits() {
    let temp = temp_dir_in_workspace();
    let lock_path = temp.path().join("handoff.pid");

    let (mut holder, _reader, status) = spawn_holder(&lock_path);
    assert!(status.starts_with("acquired "), "Got: {}", status);

    // Open before the holder exits so both handles refer to the same file
    let mut lock = PidLock::new(&lock_path).unwrap();
    assert!(lock.try_lock().is_contended());

    drop(holder.stdin.take());
    assert!(holder.wait().unwrap().success());

    // Process exit closed the holder's descriptor, which releases the lock
    let outcome = lock.try_lock();
    assert_eq!(outcome.pid(), Some(std::process::id()));
}
