// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Trigger coordination: decides when a drain pass should run.
//!
//! A background task follows the connectivity monitor and starts a pass
//! whenever the network comes back (connected and reachable) while no pass
//! is running. Manual triggers go straight to the processor and are subject
//! to the same single-flight guard.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::connectivity::{ConnectivityMonitor, ConnectivityState};
use crate::error::Result;
use crate::processor::{DrainReport, Processor};

/// Runs drain passes on connectivity transitions and on demand.
pub struct TriggerCoordinator {
    processor: Arc<Processor>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl TriggerCoordinator {
    /// Subscribe to `monitor` and start reacting to it.
    ///
    /// If the monitor already reports online, a pass starts right away.
    /// Must be called from within a tokio runtime.
    pub fn start(processor: Arc<Processor>, monitor: &dyn ConnectivityMonitor) -> Self {
        let cancel = CancellationToken::new();
        let task = tokio::spawn(follow_connectivity(
            Arc::clone(&processor),
            monitor.subscribe(),
            cancel.clone(),
        ));

        TriggerCoordinator {
            processor,
            cancel,
            task,
        }
    }

    /// Manual trigger (pull-to-refresh, "retry all").
    pub async fn trigger(&self) -> Result<Option<DrainReport>> {
        self.processor.process_queue().await
    }

    /// Whether the background task is still following the monitor.
    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        !self.cancel.is_cancelled() && !self.task.is_finished()
    }

    /// Stop following the monitor. A pass already running completes.
    pub fn cleanup(&self) {
        if !self.cancel.is_cancelled() {
            tracing::debug!("trigger coordinator stopping");
            self.cancel.cancel();
        }
    }
}

impl Drop for TriggerCoordinator {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn follow_connectivity(
    processor: Arc<Processor>,
    mut rx: watch::Receiver<ConnectivityState>,
    cancel: CancellationToken,
) {
    let mut was_online = false;

    while !cancel.is_cancelled() {
        let state = *rx.borrow_and_update();
        let online = state.is_online();

        if online && !was_online {
            if processor.is_processing() {
                tracing::debug!("connectivity restored while a drain pass is running");
            } else {
                tracing::info!("connectivity restored, draining queue");
                match processor.process_queue().await {
                    Ok(Some(report)) => {
                        tracing::debug!(?report, "triggered drain pass complete");
                    }
                    Ok(None) => {}
                    Err(e) => tracing::error!(error = %e, "triggered drain pass failed"),
                }
            }
        } else if !online && was_online {
            tracing::info!(?state, "connectivity lost, queueing locally");
        }
        was_online = online;

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    tracing::debug!("connectivity monitor closed, automatic triggers stopped");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "trigger_tests.rs"]
mod tests;
