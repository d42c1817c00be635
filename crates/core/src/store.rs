// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable key-value storage for the queues.
//!
//! Both queues are stored as a JSON array under their own key. A store only
//! moves strings; (de)serialization and the tolerance for malformed data
//! belong to the queue manager.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Mutex;

use fs2::FileExt;
use tokio::io::AsyncWriteExt;

use crate::error::{Error, Result};

/// Key of the active queue.
pub const ACTIVE_QUEUE_KEY: &str = "offline_queue";
/// Key of the dead-letter queue.
pub const DEAD_LETTER_KEY: &str = "offline_queue_failed";

/// Name of the lock file [`FileStore`] keeps next to the key files.
pub const LOCK_FILE_NAME: &str = "store.lock";

/// Boxed future returned by [`DurableStore`] methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Exclusive hold on a store; dropping it lets the next writer in.
pub trait Lease: Send {}

impl<T: Send> Lease for T {}

/// Boxed [`Lease`] returned by [`DurableStore::lock`].
pub type StoreLease = Box<dyn Lease>;

/// Persistence that survives process restarts.
///
/// `set` must replace the stored value atomically: a reader sees either the
/// previous value or the new one, never a mix.
pub trait DurableStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> StoreFuture<'_, Option<String>>;

    /// Replace the value stored under `key`.
    fn set(&self, key: &str, value: String) -> StoreFuture<'_, ()>;

    /// Delete `key`. Deleting an absent key succeeds.
    fn remove(&self, key: &str) -> StoreFuture<'_, ()>;

    /// Wait for exclusive access against every other handle on the same
    /// storage, including handles in other processes.
    ///
    /// Held across one read-modify-write. Stores only reachable from a
    /// single queue manager can rely on the default, which excludes nothing.
    fn lock(&self) -> StoreFuture<'_, StoreLease> {
        Box::pin(async { Ok(Box::new(()) as StoreLease) })
    }
}

/// In-memory store for tests and embedders that bring their own persistence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw value, bypassing the async interface.
    pub fn insert_raw(&self, key: &str, value: impl Into<String>) {
        self.entries().insert(key.to_string(), value.into());
    }

    /// Read a raw value, bypassing the async interface.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DurableStore for MemoryStore {
    fn get(&self, key: &str) -> StoreFuture<'_, Option<String>> {
        let value = self.raw(key);
        Box::pin(async move { Ok(value) })
    }

    fn set(&self, key: &str, value: String) -> StoreFuture<'_, ()> {
        self.insert_raw(key, value);
        Box::pin(async { Ok(()) })
    }

    fn remove(&self, key: &str) -> StoreFuture<'_, ()> {
        self.entries().remove(key);
        Box::pin(async { Ok(()) })
    }
}

/// File-backed store: one `<key>.json` file per key in a directory.
///
/// Writes go to `<key>.json.tmp`, are fsynced, then renamed over the target.
/// [`DurableStore::lock`] takes an exclusive `flock` on `store.lock` in the
/// same directory, so several processes can share one store.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create or open a store rooted at `dir`.
    pub fn open(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(FileStore {
            dir: dir.to_path_buf(),
        })
    }

    /// Directory holding the key files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(Error::Store(format!("invalid key '{}'", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl DurableStore for FileStore {
    fn get(&self, key: &str) -> StoreFuture<'_, Option<String>> {
        let path = self.path_for(key);
        Box::pin(async move {
            match tokio::fs::read_to_string(path?).await {
                Ok(contents) => Ok(Some(contents)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn set(&self, key: &str, value: String) -> StoreFuture<'_, ()> {
        let path = self.path_for(key);
        Box::pin(async move {
            let path = path?;
            let tmp = path.with_extension("json.tmp");

            let mut file = tokio::fs::File::create(&tmp).await?;
            file.write_all(value.as_bytes()).await?;
            file.sync_all().await?;
            drop(file);

            tokio::fs::rename(&tmp, &path).await?;
            Ok(())
        })
    }

    fn remove(&self, key: &str) -> StoreFuture<'_, ()> {
        let path = self.path_for(key);
        Box::pin(async move {
            match tokio::fs::remove_file(path?).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn lock(&self) -> StoreFuture<'_, StoreLease> {
        let path = self.dir.join(LOCK_FILE_NAME);
        Box::pin(async move {
            // flock blocks, so wait for it off the async workers.
            let file = tokio::task::spawn_blocking(move || -> std::io::Result<File> {
                let file = OpenOptions::new()
                    .create(true)
                    .truncate(false)
                    .write(true)
                    .open(&path)?;
                file.lock_exclusive()?;
                Ok(file)
            })
            .await
            .map_err(|e| Error::Store(format!("store lock task failed: {}", e)))??;
            Ok(Box::new(file) as StoreLease)
        })
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
