//! Demo command - scripted walkthrough of the lock state machine
//!
//! Opens two handles on `example.pid` and one on `example2.pid`, runs a fixed
//! sequence of lock/unlock calls and compares each outcome with the expected
//! one.

use crate::output::{print_json, print_text};
use anyhow::{Context, Result, bail};
use colored::Colorize;
use pidlock_core::{PidLock, TryLock};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process;
use tempfile::TempDir;

#[derive(Debug, Serialize)]
struct DemoOutput {
    schema_version: String,
    pid: u32,
    dir: String,
    steps: Vec<Step>,
    files_removed: bool,
    passed: bool,
}

#[derive(Debug, Serialize)]
struct Step {
    handle: &'static str,
    action: &'static str,
    expected: Outcome,
    observed: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
    correct: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum Outcome {
    Acquired,
    Contended,
    Released,
    Failed,
}

#[derive(Debug, Clone, Copy)]
enum Action {
    TryLock,
    Unlock,
}

#[derive(Debug, Clone, Copy)]
enum HandleId {
    Lock1,
    Lock2,
    Lock3,
}

impl HandleId {
    fn name(self) -> &'static str {
        match self {
            HandleId::Lock1 => "lock1",
            HandleId::Lock2 => "lock2",
            HandleId::Lock3 => "lock3",
        }
    }
}

/// The handles used by the walkthrough
struct Handles {
    lock1: PidLock,
    lock2: PidLock,
    lock3: PidLock,
}

impl Handles {
    fn get(&mut self, id: HandleId) -> &mut PidLock {
        match id {
            HandleId::Lock1 => &mut self.lock1,
            HandleId::Lock2 => &mut self.lock2,
            HandleId::Lock3 => &mut self.lock3,
        }
    }
}

const SCRIPT: &[(HandleId, Action, Outcome)] = &[
    (HandleId::Lock1, Action::TryLock, Outcome::Acquired),
    (HandleId::Lock2, Action::TryLock, Outcome::Contended),
    (HandleId::Lock3, Action::TryLock, Outcome::Acquired),
    (HandleId::Lock1, Action::TryLock, Outcome::Contended),
    (HandleId::Lock3, Action::Unlock, Outcome::Released),
    (HandleId::Lock3, Action::TryLock, Outcome::Acquired),
    (HandleId::Lock1, Action::Unlock, Outcome::Released),
    (HandleId::Lock2, Action::TryLock, Outcome::Acquired),
];

/// Run the walkthrough
///
/// # Arguments
///
/// * `dir` - Directory for the lock files; a temporary one if `None`
/// * `json` - Output in JSON format if true
///
/// # Returns
///
/// An error if any step deviates from the expected outcome
pub fn run(dir: Option<PathBuf>, json: bool) -> Result<()> {
    let temp;
    let dir = match dir {
        Some(dir) => dir,
        None => {
            temp = TempDir::new().context("Failed to create demo directory")?;
            temp.path().to_path_buf()
        }
    };

    let (steps, files_removed) = run_script(&dir)?;
    let passed = files_removed && steps.iter().all(|s| s.correct);

    let output = DemoOutput {
        schema_version: "1.0".to_string(),
        pid: process::id(),
        dir: dir.display().to_string(),
        steps,
        files_removed,
        passed,
    };

    if json {
        print_json(&serde_json::to_string_pretty(&output)?)?;
    } else {
        print_human(&output)?;
    }

    if !passed {
        bail!("demo produced unexpected outcomes");
    }
    Ok(())
}

fn run_script(dir: &Path) -> Result<(Vec<Step>, bool)> {
    let first = dir.join("example.pid");
    let second = dir.join("example2.pid");

    let mut handles = Handles {
        lock1: PidLock::new(&first)?,
        lock2: PidLock::new(&first)?,
        lock3: PidLock::new(&second)?,
    };

    let steps = SCRIPT
        .iter()
        .map(|&(handle, action, expected)| {
            let lock = handles.get(handle);
            let (observed, detail) = perform(lock, action);
            Step {
                handle: handle.name(),
                action: match action {
                    Action::TryLock => "trylock",
                    Action::Unlock => "unlock",
                },
                expected,
                observed,
                detail,
                correct: observed == expected,
            }
        })
        .collect();

    drop(handles);
    let files_removed = !first.exists() && !second.exists();

    Ok((steps, files_removed))
}

fn perform(lock: &mut PidLock, action: Action) -> (Outcome, Option<String>) {
    match action {
        Action::TryLock => match lock.try_lock() {
            TryLock::Acquired(pid) => (Outcome::Acquired, Some(format!("pid {}", pid))),
            TryLock::Contended => (Outcome::Contended, None),
            TryLock::Failed(e) => (Outcome::Failed, Some(e.to_string())),
        },
        Action::Unlock => match lock.unlock() {
            Ok(()) => (Outcome::Released, None),
            Err(e) => (Outcome::Failed, Some(e.to_string())),
        },
    }
}

fn print_human(output: &DemoOutput) -> Result<()> {
    print_text(&format!("{} (pid {})", "PID lock walkthrough".bold(), output.pid))?;
    print_text(&format!("  lock files in {}", output.dir))?;

    for step in &output.steps {
        let verdict = if step.correct {
            "Correct".green()
        } else {
            "Incorrect".red()
        };
        let detail = step
            .detail
            .as_deref()
            .map(|d| format!(" [{}]", d))
            .unwrap_or_default();
        print_text(&format!(
            "  {} {}: {:?}{} ({})",
            step.handle, step.action, step.observed, detail, verdict
        ))?;
    }

    let cleanup = if output.files_removed {
        "Correct".green()
    } else {
        "Incorrect".red()
    };
    print_text(&format!("  lock files removed on drop ({})", cleanup))?;
    Ok(())
}
