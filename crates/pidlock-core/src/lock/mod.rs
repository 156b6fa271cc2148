//! PID lock files for single-instance enforcement
//!
//! A [`PidLock`] binds a path to an open file and an advisory exclusive lock
//! (`flock`, via the fs2 crate). While the lock is held the file contains the
//! holder's process ID as decimal text. Dropping the handle closes the file,
//! which releases the lock, and removes the path whether or not the lock was
//! ever acquired.
//!
//! Acquisition never blocks: a lock held elsewhere is reported as
//! [`TryLock::Contended`], which is an expected outcome and not an error.

use std::fs::{File, OpenOptions};
use std::path::Path;

mod acquire;
mod error;
mod guard;

pub use error::{LockError, Result};
use guard::RemoveOnDrop;


/// Permission bits for newly created lock files (owner read/write).
pub const LOCK_FILE_MODE: u32 = 0o600;

/// Outcome of a non-blocking acquisition attempt
#[derive(Debug)]
#[must_use]
pub enum TryLock {
    /// The lock was granted and this PID was written to the file
    Acquired(u32),
    /// Another handle holds the lock, or this handle already does
    Contended,
    /// The OS failed for a reason other than contention
    Failed(LockError),
}

impl TryLock {
    /// Converts into the error-propagating form used by [`PidLock::lock`].
    pub fn into_result(self) -> Result<Option<u32>> {
        match self {
            TryLock::Acquired(pid) => Ok(Some(pid)),
            TryLock::Contended => Ok(None),
            TryLock::Failed(e) => Err(e),
        }
    }

    /// PID written by this attempt, if it acquired the lock
    pub fn pid(&self) -> Option<u32> {
        match self {
            TryLock::Acquired(pid) => Some(*pid),
            _ => None,
        }
    }

    pub fn is_acquired(&self) -> bool {
        matches!(self, TryLock::Acquired(_))
    }

    pub fn is_contended(&self) -> bool {
        matches!(self, TryLock::Contended)
    }
}

/// Handle on a PID lock file.
///
/// Created with [`PidLock::new`], which creates or truncates the file right
/// away. The lock itself is taken with [`PidLock::try_lock`] or
/// [`PidLock::lock`] and given back with [`PidLock::unlock`] or by dropping
/// the handle.
///
/// # Examples
///
/// ```no_run
/// use pidlock_core::lock::{PidLock, TryLock};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut lock = PidLock::new("/run/user/1000/mydaemon.pid")?;
/// match lock.try_lock() {
///     TryLock::Acquired(pid) => println!("running as {pid}"),
///     TryLock::Contended => {
///         eprintln!("another instance is running");
///         return Ok(());
///     }
///     TryLock::Failed(e) => return Err(e.into()),
/// }
/// // ... service loop ...
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PidLock {
    file: File,
    held_pid: Option<u32>,
    // Must stay after `file`: fields drop in order, so the descriptor is
    // closed before the path is unlinked.
    path: RemoveOnDrop,
}

impl PidLock {
    /// Opens (creating or truncating) the lock file at `path`.
    ///
    /// The file is created with mode [`LOCK_FILE_MODE`] on Unix. No lock is
    /// taken yet.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::Open`] if the file cannot be opened, e.g. when
    /// the parent directory does not exist or permission is denied.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(LOCK_FILE_MODE);
        }

        let file = options.open(path).map_err(|e| LockError::Open {
            path: path.to_path_buf(),
            source: e,
        })?;
        log::debug!("opened lock file {}", path.display());

        Ok(Self {
            file,
            held_pid: None,
            path: RemoveOnDrop::new(path.to_path_buf()),
        })
    }

    /// PID recorded by the last successful acquisition, while still held
    pub fn held_pid(&self) -> Option<u32> {
        self.held_pid
    }

    /// Path of the lock file
    pub fn path(&self) -> &Path {
        self.path.path()
    }

    /// Whether this handle currently holds the lock
    pub fn is_held(&self) -> bool {
        self.held_pid.is_some()
    }
}
