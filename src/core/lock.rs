//! core::lock
//!
//! Exclusive lock on a repository file.
//!
//! # Architecture
//!
//! One-shot commands load, mutate and save the repository file. Two of them
//! running at once would lose one side's commit, so each holds an OS-level
//! lock on a sibling `<file>.lock` for the whole load-run-save cycle.
//!
//! # Invariants
//!
//! - Lock acquisition is non-blocking (fails fast if locked)
//! - Lock is released on drop
//! - The lock file is left in place; only the OS lock matters
//!
//! # Example
//!
//! ```no_run
//! use snapline::core::lock::RepoLock;
//! use std::path::Path;
//!
//! let lock = RepoLock::acquire(Path::new("snapline.db")).unwrap();
//! // load, run, save ...
//! drop(lock);
//! ```

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;
use tracing::debug;

/// Errors from locking operations.
#[derive(Debug, Error)]
pub enum LockError {
    /// Another process already holds the lock.
    #[error("repository '{0}' is locked by another snapline process")]
    AlreadyLocked(PathBuf),

    /// Failed to create the lock file or its directory.
    #[error("failed to create lock: {0}")]
    CreateFailed(String),

    /// Failed to acquire the OS lock.
    #[error("failed to acquire lock: {0}")]
    AcquireFailed(String),

    /// Failed to release the lock.
    #[error("failed to release lock: {0}")]
    ReleaseFailed(String),
}

/// Path of the lock guarding `repo_file`.
pub fn lock_path(repo_file: &Path) -> PathBuf {
    let mut name = OsString::from(repo_file.as_os_str());
    name.push(".lock");
    PathBuf::from(name)
}

/// An exclusive lock on a repository file, released on drop.
#[derive(Debug)]
pub struct RepoLock {
    path: PathBuf,
    /// Some while the lock is held.
    file: Option<File>,
}

impl RepoLock {
    /// Lock `repo_file` for the duration of one command.
    ///
    /// # Errors
    ///
    /// - [`LockError::AlreadyLocked`] if another process holds the lock
    /// - [`LockError::CreateFailed`] if the lock file cannot be created
    /// - [`LockError::AcquireFailed`] if the OS lock cannot be acquired
    pub fn acquire(repo_file: &Path) -> Result<Self, LockError> {
        if let Some(parent) = repo_file.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LockError::CreateFailed(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }

        let path = lock_path(repo_file);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| {
                LockError::CreateFailed(format!("cannot open {}: {}", path.display(), e))
            })?;

        match file.try_lock_exclusive() {
            Ok(()) => {
                debug!(path = %path.display(), "acquired repository lock");
                Ok(Self {
                    path,
                    file: Some(file),
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                Err(LockError::AlreadyLocked(repo_file.to_path_buf()))
            }
            Err(e) => Err(LockError::AcquireFailed(e.to_string())),
        }
    }

    /// Check if the lock is currently held.
    pub fn is_held(&self) -> bool {
        self.file.is_some()
    }

    /// Get the path to the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the lock before the guard goes out of scope.
    pub fn release(&mut self) -> Result<(), LockError> {
        if let Some(file) = self.file.take() {
            file.unlock()
                .map_err(|e| LockError::ReleaseFailed(e.to_string()))?;
        }
        Ok(())
    }
}

impl Drop for RepoLock {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            let _ = file.unlock();
        }
    }
}
