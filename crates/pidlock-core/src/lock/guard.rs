//! RAII guard that removes the lock file path

use log::{debug, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Removes its path from the filesystem when dropped.
///
/// Removal is best-effort: a failure is logged and otherwise ignored, so
/// dropping never panics, even during unwinding.
#[derive(Debug)]
pub(crate) struct RemoveOnDrop {
    path: PathBuf,
}

impl RemoveOnDrop {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RemoveOnDrop {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!("removed lock file {}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("lock file {} already removed", self.path.display());
            }
            Err(e) => warn!("failed to remove lock file {}: {}", self.path.display(), e),
        }
    }
}
