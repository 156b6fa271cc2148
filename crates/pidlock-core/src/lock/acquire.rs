//! Lock acquisition and release against the OS advisory lock

use super::{LockError, PidLock, TryLock};
use fs2::FileExt;
use log::{debug, warn};
use std::io::{self, Seek, SeekFrom, Write};
use std::process;

impl PidLock {
    /// Attempts to take the exclusive lock without blocking.
    ///
    /// Returns [`TryLock::Acquired`] with the PID written to the file,
    /// [`TryLock::Contended`] when another handle holds the lock or this one
    /// already does, and [`TryLock::Failed`] on any other OS failure.
    pub fn try_lock(&mut self) -> TryLock {
        if self.held_pid.is_some() {
            return TryLock::Contended;
        }

        match FileExt::try_lock_exclusive(&self.file) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                debug!("lock on {} is held elsewhere", self.path().display());
                return TryLock::Contended;
            }
            Err(e) => {
                return TryLock::Failed(LockError::Lock {
                    path: self.path().to_path_buf(),
                    source: e,
                });
            }
        }

        let pid = process::id();
        if let Err(e) = self.record_pid(pid) {
            // Nobody can learn who holds the lock, so give it back
            if let Err(unlock_err) = FileExt::unlock(&self.file) {
                warn!(
                    "failed to release {} after write error: {}",
                    self.path().display(),
                    unlock_err
                );
            }
            return TryLock::Failed(LockError::Write {
                path: self.path().to_path_buf(),
                source: e,
            });
        }

        self.held_pid = Some(pid);
        debug!("acquired {} as pid {}", self.path().display(), pid);
        TryLock::Acquired(pid)
    }

    /// Attempts to take the exclusive lock, reporting failures as `Err`.
    ///
    /// `Ok(Some(pid))` means the lock was acquired, `Ok(None)` that it is
    /// already held (by another handle or by this one). This never waits for
    /// the lock; it differs from [`PidLock::try_lock`] only in how failures
    /// are reported.
    pub fn lock(&mut self) -> Result<Option<u32>, LockError> {
        self.try_lock().into_result()
    }

    /// Releases the lock.
    ///
    /// The OS release is issued even if this handle does not hold the lock.
    /// On failure the handle keeps its current state.
    pub fn unlock(&mut self) -> Result<(), LockError> {
        FileExt::unlock(&self.file).map_err(|e| LockError::Unlock {
            path: self.path().to_path_buf(),
            source: e,
        })?;

        if let Some(pid) = self.held_pid.take() {
            debug!("released {} held by pid {}", self.path().display(), pid);
        }
        Ok(())
    }

    fn record_pid(&mut self, pid: u32) -> io::Result<()> {
        self.file.set_len(0)?;
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(pid.to_string().as_bytes())?;
        self.file.flush()
    }
}
