// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The offline queue service object.
//!
//! [`OfflineQueue`] wires a [`QueueManager`], a [`Processor`] and optionally a
//! [`TriggerCoordinator`] around injected dependencies. Several instances can
//! coexist; each owns its own single-flight guard and event bus.
//!
//! ```rust,ignore
//! let queue = OfflineQueue::new(QueueConfig::default(), store, executor);
//! let id = queue.enqueue(Operation::check_in(image, "32.08,34.78")).await?;
//! queue.process_queue().await?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use crate::connectivity::ConnectivityMonitor;
use crate::error::Result;
use crate::event::{EventBus, QueueEvent};
use crate::executor::Executor;
use crate::flight::SingleFlight;
use crate::item::{DeadLetterItem, Operation, QueueItem, DEFAULT_MAX_RETRIES};
use crate::manager::QueueManager;
use crate::processor::{DrainReport, Processor};
use crate::status::QueueStatus;
use crate::store::DurableStore;
use crate::trigger::TriggerCoordinator;

/// Configuration for an [`OfflineQueue`].
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Retry ceiling stamped on newly enqueued items.
    pub max_retries: u32,
    /// Upper bound on a single executor call.
    pub call_timeout: Duration,
    /// Events buffered per subscriber before it starts lagging.
    pub event_capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        QueueConfig {
            max_retries: DEFAULT_MAX_RETRIES,
            call_timeout: Duration::from_secs(30),
            event_capacity: 64,
        }
    }
}

/// Durable queue of write operations awaiting delivery.
pub struct OfflineQueue {
    manager: Arc<QueueManager>,
    processor: Arc<Processor>,
    events: EventBus,
    coordinator: Option<TriggerCoordinator>,
}

impl OfflineQueue {
    /// Create a queue without automatic triggers.
    pub fn new(
        config: QueueConfig,
        store: Arc<dyn DurableStore>,
        executor: Arc<dyn Executor>,
    ) -> Self {
        let events = EventBus::new(config.event_capacity);
        let flight = Arc::new(SingleFlight::new());
        let manager = Arc::new(QueueManager::new(
            store,
            events.clone(),
            Arc::clone(&flight),
            config.max_retries,
        ));
        let processor = Arc::new(Processor::new(
            Arc::clone(&manager),
            executor,
            events.clone(),
            flight,
            config.call_timeout,
        ));

        OfflineQueue {
            manager,
            processor,
            events,
            coordinator: None,
        }
    }

    /// Follow `monitor`, replacing any previous subscription.
    pub fn watch_connectivity(&mut self, monitor: &dyn ConnectivityMonitor) {
        if let Some(previous) = self.coordinator.take() {
            previous.cleanup();
        }
        self.coordinator = Some(TriggerCoordinator::start(
            Arc::clone(&self.processor),
            monitor,
        ));
    }

    /// Receive queue events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<QueueEvent> {
        self.events.subscribe()
    }

    /// Accept an operation for delivery and return its id.
    pub async fn enqueue(&self, op: Operation) -> Result<String> {
        self.manager.enqueue(op).await
    }

    /// Manual trigger: run one drain pass unless one is already running.
    pub async fn process_queue(&self) -> Result<Option<DrainReport>> {
        self.processor.process_queue().await
    }

    pub fn is_processing(&self) -> bool {
        self.processor.is_processing()
    }

    pub async fn get_queue(&self) -> Result<Vec<QueueItem>> {
        self.manager.get_queue().await
    }

    pub async fn get_failed_queue(&self) -> Result<Vec<DeadLetterItem>> {
        self.manager.get_failed_queue().await
    }

    pub async fn get_queue_status(&self) -> Result<QueueStatus> {
        self.manager.status().await
    }

    /// Move a dead-letter item back and attempt delivery right away.
    ///
    /// Returns false, doing nothing, if `id` is not in the dead-letter queue.
    pub async fn retry_failed_item(&self, id: &str) -> Result<bool> {
        if self.manager.requeue_failed(id).await?.is_none() {
            tracing::debug!(id, "retry requested for unknown failed item");
            return Ok(false);
        }
        self.processor.process_queue().await?;
        Ok(true)
    }

    /// Move every dead-letter item back and run one drain pass.
    ///
    /// Returns how many items were requeued.
    pub async fn retry_all_failed(&self) -> Result<usize> {
        let revived = self.manager.requeue_all_failed().await?;
        if !revived.is_empty() {
            self.processor.process_queue().await?;
        }
        Ok(revived.len())
    }

    pub async fn clear_queue(&self) -> Result<()> {
        self.manager.clear_queue().await
    }

    pub async fn clear_failed_queue(&self) -> Result<()> {
        self.manager.clear_failed_queue().await
    }

    /// Stop following the connectivity monitor.
    pub fn cleanup(&mut self) {
        if let Some(coordinator) = self.coordinator.take() {
            coordinator.cleanup();
        }
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
