//! Hold command - keep a single-instance lock for a while

use crate::output::print_text;
use anyhow::{Context, Result, bail};
use log::info;
use pidlock_core::PidLock;
use std::io::{self, Read};
use std::path::Path;
use std::thread;
use std::time::Duration;

/// Acquire the lock at `path` and hold it
///
/// Holds for `seconds` if given, otherwise until stdin reaches EOF. Fails if
/// another instance already holds the lock.
///
/// Opening the handle truncates the file and dropping it removes the path,
/// even when the lock turns out to be contended. A failed `hold` against a
/// running instance therefore erases that instance's PID text and unlinks
/// its lock file; the instance keeps its lock on the now-unlinked file.
pub fn run(path: &Path, seconds: Option<u64>) -> Result<()> {
    let mut lock = PidLock::new(path)?;

    let Some(pid) = lock.lock()? else {
        bail!("{} is held by another instance", path.display());
    };
    print_text(&format!("acquired {} as pid {}", path.display(), pid))?;

    match seconds {
        Some(secs) => thread::sleep(Duration::from_secs(secs)),
        None => {
            info!("holding {} until stdin closes", path.display());
            let mut sink = Vec::new();
            io::stdin()
                .read_to_end(&mut sink)
                .context("Failed to read stdin")?;
        }
    }

    lock.unlock()?;
    print_text(&format!("released {}", path.display()))?;
    Ok(())
}
