// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Cross-process drain lock.
//!
//! The in-process single-flight guard cannot see other `punch` processes, so
//! every command that delivers holds an exclusive lock on
//! `<state_dir>/drain.lock` for as long as it may run a drain pass.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::{Error, Result};

const LOCK_NAME: &str = "drain.lock";

/// Held exclusive lock; released on drop.
#[derive(Debug)]
pub struct DrainLock {
    _file: File,
}

impl DrainLock {
    /// Take the lock without waiting.
    ///
    /// Returns [`Error::DrainLocked`] if another process holds it.
    pub fn acquire(state_dir: &Path) -> Result<Self> {
        let file = open(state_dir)?;
        file.try_lock_exclusive().map_err(|_| Error::DrainLocked)?;
        tracing::debug!(path = %lock_path(state_dir).display(), "drain lock acquired");
        Ok(DrainLock { _file: file })
    }

    /// Whether some process currently holds the lock.
    pub fn is_held(state_dir: &Path) -> bool {
        match open(state_dir) {
            Ok(file) => match file.try_lock_exclusive() {
                Ok(()) => {
                    let _ = FileExt::unlock(&file);
                    false
                }
                Err(_) => true,
            },
            Err(_) => false,
        }
    }
}

fn lock_path(state_dir: &Path) -> PathBuf {
    state_dir.join(LOCK_NAME)
}

fn open(state_dir: &Path) -> Result<File> {
    fs::create_dir_all(state_dir)?;
    let file = fs::OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(lock_path(state_dir))?;
    Ok(file)
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
