// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Drain pass over the active queue.
//!
//! A pass reads the active queue once, then visits each item of that
//! snapshot in stored order, one at a time:
//!
//! ```text
//!   pending item ──► executor ──► ok ──────────────► remove from queue
//!                         │
//!                         └──► err ─► retry_count += 1
//!                                       │
//!                     retryable & below max ──► update in place
//!                                       │
//!                                 otherwise ──► dead-letter queue
//! ```
//!
//! Items enqueued while a pass runs wait for the next pass. A failure while
//! handling one item, including a panic inside the executor, only affects
//! that item.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use serde::Serialize;

use crate::error::Result;
use crate::event::{EventBus, QueueEvent};
use crate::executor::{dispatch, Executor, ExecutorError, ExecutorResult, Receipt};
use crate::flight::SingleFlight;
use crate::item::QueueItem;
use crate::manager::QueueManager;

/// Counts from one drain pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DrainReport {
    /// Items in the snapshot.
    pub visited: usize,
    pub succeeded: usize,
    /// Failed but kept for a later pass.
    pub retried: usize,
    /// Moved to the dead-letter queue.
    pub escalated: usize,
    /// Not pending, so never handed to the executor.
    pub skipped: usize,
}

/// Drains the active queue through an [`Executor`].
pub struct Processor {
    manager: Arc<QueueManager>,
    executor: Arc<dyn Executor>,
    events: EventBus,
    flight: Arc<SingleFlight>,
    call_timeout: Duration,
}

impl Processor {
    pub fn new(
        manager: Arc<QueueManager>,
        executor: Arc<dyn Executor>,
        events: EventBus,
        flight: Arc<SingleFlight>,
        call_timeout: Duration,
    ) -> Self {
        Processor {
            manager,
            executor,
            events,
            flight,
            call_timeout,
        }
    }

    /// Whether a drain pass is in flight.
    pub fn is_processing(&self) -> bool {
        self.flight.is_running()
    }

    /// Run one drain pass.
    ///
    /// Returns `Ok(None)` without doing anything if another pass is already
    /// running. A store failure while reading the snapshot aborts the pass;
    /// store failures while handling individual items are logged, the pass
    /// continues, and the first one is returned at the end.
    pub async fn process_queue(&self) -> Result<Option<DrainReport>> {
        let Some(_flight) = self.flight.try_begin() else {
            tracing::debug!("drain pass already running, skipping");
            return Ok(None);
        };

        let snapshot = self.manager.get_queue().await?;
        tracing::debug!(items = snapshot.len(), "drain pass started");

        let mut report = DrainReport::default();
        let mut first_error = None;

        for item in snapshot {
            report.visited += 1;
            if !item.is_pending() {
                tracing::debug!(id = %item.id, status = %item.status, "skipping non-pending item");
                report.skipped += 1;
                continue;
            }

            let handled = match self.deliver(&item).await {
                Ok(receipt) => self.on_success(item, &receipt, &mut report).await,
                Err(e) => self.on_failure(item, e, &mut report).await,
            };
            if let Err(e) = handled {
                tracing::error!(error = %e, "failed to persist item outcome");
                first_error.get_or_insert(e);
            }
        }

        tracing::info!(
            visited = report.visited,
            succeeded = report.succeeded,
            retried = report.retried,
            escalated = report.escalated,
            skipped = report.skipped,
            "drain pass finished"
        );

        match first_error {
            Some(e) => Err(e),
            None => Ok(Some(report)),
        }
    }

    /// Make one delivery attempt. Timeouts and panics become failures.
    async fn deliver(&self, item: &QueueItem) -> ExecutorResult<Receipt> {
        let timeout = self.call_timeout;
        let attempt = async {
            let call = dispatch(self.executor.as_ref(), &item.operation_type, &item.payload);
            tokio::time::timeout(timeout, call).await
        };

        match AssertUnwindSafe(attempt).catch_unwind().await {
            Ok(Ok(result)) => result,
            Ok(Err(_elapsed)) => Err(ExecutorError::Timeout(
                u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            )),
            Err(panic) => Err(ExecutorError::Panicked(panic_message(panic.as_ref()))),
        }
    }

    async fn on_success(
        &self,
        item: QueueItem,
        receipt: &Receipt,
        report: &mut DrainReport,
    ) -> Result<()> {
        tracing::info!(id = %item.id, operation = %item.operation_type, %receipt, "operation delivered");
        self.manager.remove_from_queue(&item.id).await?;
        report.succeeded += 1;
        self.events.emit(QueueEvent::Succeeded {
            id: item.id,
            operation_type: item.operation_type,
        });
        Ok(())
    }

    async fn on_failure(
        &self,
        mut item: QueueItem,
        error: ExecutorError,
        report: &mut DrainReport,
    ) -> Result<()> {
        item.record_failure(error.to_string());

        if error.is_retryable() && !item.is_exhausted() {
            tracing::warn!(
                id = %item.id,
                operation = %item.operation_type,
                retry_count = item.retry_count,
                max_retries = item.max_retries,
                error = %error,
                "delivery failed, will retry"
            );
            if self.manager.update_queue_item(&item).await? {
                report.retried += 1;
                self.events.emit(QueueEvent::RetryScheduled {
                    id: item.id,
                    operation_type: item.operation_type,
                    retry_count: item.retry_count,
                    max_retries: item.max_retries,
                    error: error.to_string(),
                });
            }
            return Ok(());
        }

        tracing::error!(
            id = %item.id,
            operation = %item.operation_type,
            retry_count = item.retry_count,
            error = %error,
            "delivery failed permanently, moving to dead-letter queue"
        );
        if let Some(dead) = self.manager.escalate(item).await? {
            report.escalated += 1;
            self.events.emit(QueueEvent::Escalated {
                id: dead.id,
                operation_type: dead.operation_type,
                retry_count: dead.retry_count,
                error: error.to_string(),
            });
        }
        Ok(())
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
#[path = "processor_tests.rs"]
mod tests;
