//! Error types for PID lock operations

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for lock operations
///
/// Every variant keeps the originating [`io::Error`], so the raw OS code
/// (`ENOENT`, `EACCES`, ...) stays available through [`LockError::raw_os_error`].
/// Contention is not an error and never shows up here.
#[derive(Error, Debug)]
pub enum LockError {
    /// The lock file could not be opened or created
    #[error("LOCK_OPEN_FAILED: cannot open {}: {source}", .path.display())]
    Open {
        /// Path to the lock file
        path: PathBuf,
        /// The underlying I/O error
        source: io::Error,
    },

    /// The lock primitive failed for a reason other than contention
    #[error("LOCK_ACQUIRE_FAILED: cannot lock {}: {source}", .path.display())]
    Lock { path: PathBuf, source: io::Error },

    /// The lock was granted but the PID could not be recorded
    #[error("LOCK_WRITE_FAILED: locked {} but could not record pid: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    /// Releasing the lock failed
    #[error("LOCK_RELEASE_FAILED: cannot unlock {}: {source}", .path.display())]
    Unlock { path: PathBuf, source: io::Error },
}

impl LockError {
    /// The I/O error that caused this failure
    pub fn io_error(&self) -> &io::Error {
        match self {
            LockError::Open { source, .. }
            | LockError::Lock { source, .. }
            | LockError::Write { source, .. }
            | LockError::Unlock { source, .. } => source,
        }
    }

    /// Path of the lock file involved
    pub fn path(&self) -> &Path {
        match self {
            LockError::Open { path, .. }
            | LockError::Lock { path, .. }
            | LockError::Write { path, .. }
            | LockError::Unlock { path, .. } => path,
        }
    }

    /// Raw OS error code (errno), if the failure came from the OS
    pub fn raw_os_error(&self) -> Option<i32> {
        self.io_error().raw_os_error()
    }
}

pub type Result<T> = std::result::Result<T, LockError>;
