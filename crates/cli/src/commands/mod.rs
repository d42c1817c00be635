// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod clear;
pub mod inspect;
pub mod process;
pub mod record;
pub mod retry;
pub mod watch;
#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use punch_core::{
    DrainReport, DurableStore, EventBus, Executor, FileStore, OfflineQueue, QueueManager,
    SingleFlight,
};
use serde::Serialize;

use crate::config::{config_path, resolve_state_dir, Config};
use crate::error::{Error, Result};
use crate::http::HttpExecutor;
use crate::lock::DrainLock;

const QUEUE_DIR_NAME: &str = "queue";

/// Resolved state directory and configuration for one invocation.
#[derive(Debug, Clone)]
pub struct Context {
    pub state_dir: PathBuf,
    pub config: Config,
}

impl Context {
    /// Resolve the state directory and load its configuration.
    pub fn load(state_dir: Option<PathBuf>) -> Result<Self> {
        let state_dir = resolve_state_dir(state_dir)?;
        let config = Config::load(&state_dir)?.with_env_overrides();
        tracing::debug!(state_dir = %state_dir.display(), "context loaded");
        Ok(Context::new(state_dir, config))
    }

    pub fn new(state_dir: PathBuf, config: Config) -> Self {
        Context { state_dir, config }
    }

    fn store(&self) -> Result<Arc<dyn DurableStore>> {
        let store = FileStore::open(&self.state_dir.join(QUEUE_DIR_NAME))?;
        Ok(Arc::new(store))
    }

    /// Queue manager for commands that never deliver.
    pub fn manager(&self) -> Result<QueueManager> {
        Ok(QueueManager::new(
            self.store()?,
            EventBus::default(),
            Arc::new(SingleFlight::new()),
            self.config.queue.max_retries,
        ))
    }

    /// Full queue delivering through `executor`.
    pub fn queue(&self, executor: Arc<dyn Executor>) -> Result<OfflineQueue> {
        Ok(OfflineQueue::new(
            self.config.queue_config(),
            self.store()?,
            executor,
        ))
    }

    /// The configured HTTP executor.
    ///
    /// Fails when no API url is configured.
    pub fn executor(&self) -> Result<Arc<dyn Executor>> {
        let url = self.config.api_url()?.ok_or_else(|| Error::ApiNotConfigured {
            config: config_path(&self.state_dir).display().to_string(),
        })?;
        let executor = HttpExecutor::new(
            url,
            self.config.request_timeout(),
            self.config.api_token(),
        )?;
        Ok(Arc::new(executor))
    }

    /// Take the cross-process drain lock.
    pub fn lock(&self) -> Result<DrainLock> {
        DrainLock::acquire(&self.state_dir)
    }
}

/// Run one drain pass while holding the drain lock.
pub(crate) async fn drain(ctx: &Context, queue: &OfflineQueue) -> Result<DrainReport> {
    let _lock = ctx.lock()?;
    Ok(queue.process_queue().await?.unwrap_or_default())
}

/// Write `value` as pretty JSON followed by a newline.
pub(crate) fn print_json<T: Serialize>(out: &mut impl Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
