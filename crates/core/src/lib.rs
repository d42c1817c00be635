// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! punch-core: durable offline queue for attendance operations.
//!
//! Check-ins and check-outs are accepted locally, persisted, and delivered to
//! the remote service when the network allows. Delivery is at-least-once;
//! items that keep failing end up in a dead-letter queue for manual retry.
//!
//! # Architecture
//!
//! ```text
//!  caller ──► QueueManager ──► DurableStore
//!
//!  ConnectivityMonitor ──► TriggerCoordinator ──► Processor ──► Executor
//!                                                    │
//!                                                    ▼
//!                                              QueueManager ──► DurableStore
//! ```
//!
//! [`OfflineQueue`] is the public entry point tying these together.

pub mod connectivity;
pub mod error;
pub mod event;
pub mod executor;
pub mod flight;
pub mod id;
pub mod item;
pub mod manager;
pub mod processor;
pub mod queue;
pub mod status;
pub mod store;
pub mod trigger;

#[cfg(test)]
mod test_helpers;

pub use connectivity::{ConnectivityMonitor, ConnectivityState, ManualConnectivity};
pub use error::{Error, Result};
pub use event::{EventBus, QueueEvent};
pub use executor::{Executor, ExecutorError, ExecutorFuture, ExecutorResult, Receipt};
pub use flight::SingleFlight;
pub use item::{
    DeadLetterItem, FailedStatus, ItemStatus, Operation, OperationType, Payload, QueueItem,
    DEFAULT_MAX_RETRIES,
};
pub use manager::QueueManager;
pub use processor::{DrainReport, Processor};
pub use queue::{OfflineQueue, QueueConfig};
pub use status::QueueStatus;
pub use store::{DurableStore, FileStore, Lease, MemoryStore, StoreLease};
pub use trigger::TriggerCoordinator;
