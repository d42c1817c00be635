// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Structured queue events for presentation layers.
//!
//! The queue never calls into UI code. It publishes [`QueueEvent`]s on a
//! broadcast channel and whoever cares subscribes. Publishing never blocks
//! and never fails: with no subscribers the event is dropped, and a slow
//! subscriber only loses its own oldest events.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::item::OperationType;

/// Something user-visible happened to a queued operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum QueueEvent {
    /// Accepted for later delivery.
    Enqueued {
        id: String,
        operation_type: OperationType,
    },
    /// Delivered and removed from the active queue.
    Succeeded {
        id: String,
        operation_type: OperationType,
    },
    /// Delivery failed; the item stays queued for a later pass.
    RetryScheduled {
        id: String,
        operation_type: OperationType,
        retry_count: u32,
        max_retries: u32,
        error: String,
    },
    /// Retries exhausted; moved to the dead-letter queue.
    Escalated {
        id: String,
        operation_type: OperationType,
        retry_count: u32,
        error: String,
    },
    /// Moved back from the dead-letter queue by a manual retry.
    Requeued {
        id: String,
        operation_type: OperationType,
    },
}

impl QueueEvent {
    /// Id of the item the event is about.
    pub fn id(&self) -> &str {
        match self {
            QueueEvent::Enqueued { id, .. }
            | QueueEvent::Succeeded { id, .. }
            | QueueEvent::RetryScheduled { id, .. }
            | QueueEvent::Escalated { id, .. }
            | QueueEvent::Requeued { id, .. } => id,
        }
    }

    /// Short user-facing message, as a notification would show it.
    pub fn message(&self) -> String {
        match self {
            QueueEvent::Enqueued { operation_type, .. } => {
                format!("{} saved offline; it will be sent when connection returns", operation_type)
            }
            QueueEvent::Succeeded { operation_type, .. } => {
                format!("{} synced successfully", operation_type)
            }
            QueueEvent::RetryScheduled {
                operation_type,
                retry_count,
                max_retries,
                ..
            } => format!(
                "{} failed to sync (attempt {}/{}), will retry",
                operation_type, retry_count, max_retries
            ),
            QueueEvent::Escalated { operation_type, .. } => format!(
                "{} failed to sync after all retries; manual retry required",
                operation_type
            ),
            QueueEvent::Requeued { operation_type, .. } => {
                format!("{} queued for another attempt", operation_type)
            }
        }
    }
}

/// Fan-out channel for [`QueueEvent`]s.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<QueueEvent>,
}

impl EventBus {
    /// Create a bus that buffers up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        EventBus { tx }
    }

    /// Subscribe to events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<QueueEvent> {
        self.tx.subscribe()
    }

    /// Publish an event. Fire-and-forget.
    pub fn emit(&self, event: QueueEvent) {
        tracing::trace!(id = event.id(), ?event, "queue event");
        // Err only means nobody is listening.
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
