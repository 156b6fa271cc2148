//! Test utilities for pidlock
//!
//! This crate provides shared testing utilities used across the pidlock workspace.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Creates a temporary directory within `.tmp/` at the current directory
///
/// Keeps lock files created by tests in one gitignored place that is easy to
/// clean up manually if a test process is killed before its handles drop.
///
/// # Panics
///
/// Panics if:
/// - Unable to determine current directory
/// - Unable to create `.tmp/` directory
/// - Unable to create temporary subdirectory
///
/// # Examples
///
/// ```rust
/// use pidlock_testkit::temp_dir_in_workspace;
///
/// let temp = temp_dir_in_workspace();
/// let lock_path = temp.path().join("test.pid");
/// assert!(!lock_path.exists());
/// // Cleanup happens automatically when temp is dropped
/// ```
pub fn temp_dir_in_workspace() -> TempDir {
    try_temp_dir_in_workspace().expect("Failed to create temporary directory in .tmp/")
}

/// Alternative with Result for callers that handle errors themselves
pub fn try_temp_dir_in_workspace() -> std::io::Result<TempDir> {
    let workspace_root = std::env::current_dir()?;
    let tmp_base = workspace_root.join(".tmp");
    std::fs::create_dir_all(&tmp_base)?;
    TempDir::new_in(&tmp_base)
}

/// Reads the PID recorded in a lock file
///
/// Returns `None` if the file is missing, empty, or does not contain a
/// decimal PID.
pub fn read_pid_file(path: &Path) -> Option<u32> {
    std::fs::read_to_string(path).ok()?.trim().parse().ok()
}

/// Get the path to a compiled example binary
///
/// Example binaries are built by `cargo test` into `target/debug/examples/`.
///
/// # Panics
///
/// Panics if unable to determine the current executable path
///
/// # Examples
///
/// ```no_run
/// use pidlock_testkit::example_bin;
/// use std::process::Command;
///
/// let output = Command::new(example_bin("lock_holder"))
///     .arg("test.pid")
///     .output()
///     .unwrap();
/// assert!(output.status.success());
/// ```
pub fn example_bin(name: &str) -> PathBuf {
    let mut path = std::env::current_exe().expect("Failed to get current executable path");

    // Navigate from target/debug/deps/test_binary to target/debug/examples/
    path.pop(); // Remove test binary name
    path.pop(); // Remove "deps"
    path.push("examples");
    path.push(name);

    // Add .exe extension on Windows
    if cfg!(target_os = "windows") {
        path.set_extension("exe");
    }

    path
}
