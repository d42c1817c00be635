// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queue manager: every read and write of the two persisted queues.
//!
//! Each operation is one short read-modify-write against the store. Writers
//! hold the manager's lock and the store's lease for that operation only, so
//! other managers on the same storage, in this process or another, cannot
//! interleave and write back a stale list. Nothing here keeps a cached copy
//! of either list; the store is the single source of truth.

use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard};

use crate::error::Result;
use crate::event::{EventBus, QueueEvent};
use crate::flight::SingleFlight;
use crate::id::generate_unique_id;
use crate::item::{DeadLetterItem, Operation, QueueItem};
use crate::status::QueueStatus;
use crate::store::{DurableStore, StoreLease, ACTIVE_QUEUE_KEY, DEAD_LETTER_KEY};

/// Owns enqueue, removal, retry bookkeeping and dead-letter escalation.
pub struct QueueManager {
    store: Arc<dyn DurableStore>,
    events: EventBus,
    flight: Arc<SingleFlight>,
    max_retries: u32,
    /// Serializes this manager's operations; the store lease covers the rest.
    lock: Mutex<()>,
}

impl QueueManager {
    pub fn new(
        store: Arc<dyn DurableStore>,
        events: EventBus,
        flight: Arc<SingleFlight>,
        max_retries: u32,
    ) -> Self {
        QueueManager {
            store,
            events,
            flight,
            max_retries,
            lock: Mutex::new(()),
        }
    }

    /// Append a new pending item and return its id.
    ///
    /// The payload timestamp is taken now, when the real-world event is
    /// recorded, regardless of when delivery eventually happens.
    pub async fn enqueue(&self, op: Operation) -> Result<String> {
        op.validate()?;

        let item = {
            let _section = self.exclusive().await?;
            let mut queue: Vec<QueueItem> = self.load(ACTIVE_QUEUE_KEY).await?;
            let failed: Vec<DeadLetterItem> = self.load(DEAD_LETTER_KEY).await?;

            let now = Utc::now();
            let id = generate_unique_id(&op.operation_type, &op.location, &now, |candidate| {
                queue.iter().any(|i| i.id == candidate) || failed.iter().any(|i| i.id == candidate)
            });
            let item = QueueItem::new(id, op, now, self.max_retries);
            queue.push(item.clone());
            self.save(ACTIVE_QUEUE_KEY, &queue).await?;
            item
        };

        tracing::info!(id = %item.id, operation = %item.operation_type, "operation queued");
        self.events.emit(QueueEvent::Enqueued {
            id: item.id.clone(),
            operation_type: item.operation_type,
        });
        Ok(item.id)
    }

    /// Current active queue in stored order.
    pub async fn get_queue(&self) -> Result<Vec<QueueItem>> {
        let _guard = self.lock.lock().await;
        self.load(ACTIVE_QUEUE_KEY).await
    }

    /// Current dead-letter queue in escalation order.
    pub async fn get_failed_queue(&self) -> Result<Vec<DeadLetterItem>> {
        let _guard = self.lock.lock().await;
        self.load(DEAD_LETTER_KEY).await
    }

    /// Point-in-time counts of both queues.
    pub async fn status(&self) -> Result<QueueStatus> {
        let _guard = self.lock.lock().await;
        let queue: Vec<QueueItem> = self.load(ACTIVE_QUEUE_KEY).await?;
        let failed: Vec<DeadLetterItem> = self.load(DEAD_LETTER_KEY).await?;

        Ok(QueueStatus {
            pending: queue.iter().filter(|i| i.is_pending()).count(),
            processing: self.flight.is_running(),
            failed: failed.len(),
            total: queue.len(),
        })
    }

    /// Remove an item from the active queue.
    ///
    /// Returns false if it was no longer there.
    pub(crate) async fn remove_from_queue(&self, id: &str) -> Result<bool> {
        let _section = self.exclusive().await?;
        let mut queue: Vec<QueueItem> = self.load(ACTIVE_QUEUE_KEY).await?;
        let before = queue.len();
        queue.retain(|i| i.id != id);
        if queue.len() == before {
            return Ok(false);
        }
        self.save(ACTIVE_QUEUE_KEY, &queue).await?;
        Ok(true)
    }

    /// Replace an active item in place, keeping its position.
    ///
    /// Returns false if it was no longer there; a cleared item is not
    /// resurrected.
    pub(crate) async fn update_queue_item(&self, updated: &QueueItem) -> Result<bool> {
        let _section = self.exclusive().await?;
        let mut queue: Vec<QueueItem> = self.load(ACTIVE_QUEUE_KEY).await?;
        let Some(slot) = queue.iter_mut().find(|i| i.id == updated.id) else {
            return Ok(false);
        };
        *slot = updated.clone();
        self.save(ACTIVE_QUEUE_KEY, &queue).await?;
        Ok(true)
    }

    /// Move an item from the active queue to the dead-letter queue.
    ///
    /// The dead-letter entry is written before the active entry is removed,
    /// so a crash in between leaves a duplicate rather than losing the item.
    /// Returns `None` if the item had already left the active queue.
    pub(crate) async fn escalate(&self, item: QueueItem) -> Result<Option<DeadLetterItem>> {
        let _section = self.exclusive().await?;
        let mut queue: Vec<QueueItem> = self.load(ACTIVE_QUEUE_KEY).await?;
        if !queue.iter().any(|i| i.id == item.id) {
            return Ok(None);
        }

        let dead = item.into_dead_letter(Utc::now());
        let mut failed: Vec<DeadLetterItem> = self.load(DEAD_LETTER_KEY).await?;
        failed.retain(|i| i.id != dead.id);
        failed.push(dead.clone());
        self.save(DEAD_LETTER_KEY, &failed).await?;

        queue.retain(|i| i.id != dead.id);
        self.save(ACTIVE_QUEUE_KEY, &queue).await?;
        Ok(Some(dead))
    }

    /// Move one dead-letter item back to the end of the active queue with a
    /// fresh retry budget. Returns `None` if no such item exists.
    pub async fn requeue_failed(&self, id: &str) -> Result<Option<QueueItem>> {
        let revived = {
            let _section = self.exclusive().await?;
            let mut failed: Vec<DeadLetterItem> = self.load(DEAD_LETTER_KEY).await?;
            let Some(pos) = failed.iter().position(|i| i.id == id) else {
                return Ok(None);
            };
            let revived = failed.remove(pos).revive();

            let mut queue: Vec<QueueItem> = self.load(ACTIVE_QUEUE_KEY).await?;
            upsert(&mut queue, revived.clone());
            self.save(ACTIVE_QUEUE_KEY, &queue).await?;
            self.save(DEAD_LETTER_KEY, &failed).await?;
            revived
        };

        self.emit_requeued(&revived);
        Ok(Some(revived))
    }

    /// Move every dead-letter item back, preserving escalation order.
    pub async fn requeue_all_failed(&self) -> Result<Vec<QueueItem>> {
        let revived: Vec<QueueItem> = {
            let _section = self.exclusive().await?;
            let failed: Vec<DeadLetterItem> = self.load(DEAD_LETTER_KEY).await?;
            if failed.is_empty() {
                return Ok(Vec::new());
            }
            let revived: Vec<QueueItem> = failed.into_iter().map(DeadLetterItem::revive).collect();

            let mut queue: Vec<QueueItem> = self.load(ACTIVE_QUEUE_KEY).await?;
            for item in &revived {
                upsert(&mut queue, item.clone());
            }
            self.save(ACTIVE_QUEUE_KEY, &queue).await?;
            self.store.remove(DEAD_LETTER_KEY).await?;
            revived
        };

        for item in &revived {
            self.emit_requeued(item);
        }
        Ok(revived)
    }

    /// Erase the active queue.
    pub async fn clear_queue(&self) -> Result<()> {
        let _section = self.exclusive().await?;
        self.store.remove(ACTIVE_QUEUE_KEY).await?;
        tracing::info!("active queue cleared");
        Ok(())
    }

    /// Erase the dead-letter queue.
    pub async fn clear_failed_queue(&self) -> Result<()> {
        let _section = self.exclusive().await?;
        self.store.remove(DEAD_LETTER_KEY).await?;
        tracing::info!("dead-letter queue cleared");
        Ok(())
    }

    /// Enter a write section: this manager's lock, then the store lease.
    /// Both are released when the returned pair drops.
    async fn exclusive(&self) -> Result<(StoreLease, MutexGuard<'_, ()>)> {
        let guard = self.lock.lock().await;
        let lease = self.store.lock().await?;
        Ok((lease, guard))
    }

    fn emit_requeued(&self, item: &QueueItem) {
        tracing::info!(id = %item.id, operation = %item.operation_type, "failed operation requeued");
        self.events.emit(QueueEvent::Requeued {
            id: item.id.clone(),
            operation_type: item.operation_type.clone(),
        });
    }

    /// Read a list. Absent or malformed data reads as empty.
    async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(items) => Ok(items),
            Err(e) => {
                tracing::warn!(key, error = %e, "malformed queue data, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    async fn save<T: Serialize>(&self, key: &str, items: &[T]) -> Result<()> {
        let json = serde_json::to_string(items)?;
        self.store.set(key, json).await
    }
}

/// Replace the item with the same id, or append it.
fn upsert(queue: &mut Vec<QueueItem>, item: QueueItem) {
    match queue.iter_mut().find(|i| i.id == item.id) {
        Some(slot) => *slot = item,
        None => queue.push(item),
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
