// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fakes for queue tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use tokio::sync::{Notify, Semaphore};

use crate::error::Error;
use crate::event::EventBus;
use crate::executor::{Executor, ExecutorError, ExecutorFuture};
use crate::flight::SingleFlight;
use crate::item::{OperationType, Payload};
use crate::manager::QueueManager;
use crate::store::{DurableStore, FileStore, MemoryStore, StoreFuture, StoreLease};

/// What the mock executor does for one call.
#[derive(Debug, Clone)]
pub enum Outcome {
    Succeed,
    Fail(ExecutorError),
    Panic,
    Hang,
}

impl Outcome {
    pub fn fail() -> Self {
        Outcome::Fail(ExecutorError::Request("mock failure".into()))
    }
}

/// Scripted executor. Outcomes are consumed in call order; when the script
/// runs out the default applies.
pub struct MockExecutor {
    script: Mutex<VecDeque<Outcome>>,
    default: Outcome,
    calls: Mutex<Vec<(OperationType, Payload)>>,
    entered: Notify,
    /// When present, every call waits for a permit before answering.
    gate: Option<Semaphore>,
}

impl MockExecutor {
    pub fn succeeding() -> Self {
        Self::with_default(Outcome::Succeed)
    }

    pub fn failing() -> Self {
        Self::with_default(Outcome::fail())
    }

    pub fn with_default(default: Outcome) -> Self {
        MockExecutor {
            script: Mutex::new(VecDeque::new()),
            default,
            calls: Mutex::new(Vec::new()),
            entered: Notify::new(),
            gate: None,
        }
    }

    /// Hold every call until [`MockExecutor::release`] hands out a permit.
    pub fn gated(mut self) -> Self {
        self.gate = Some(Semaphore::new(0));
        self
    }

    pub fn push(&self, outcome: Outcome) {
        self.script.lock().unwrap().push_back(outcome);
    }

    pub fn release(&self, calls: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(calls);
        }
    }

    /// Wait until a call has reached the executor.
    pub async fn wait_entered(&self) {
        self.entered.notified().await;
    }

    pub fn calls(&self) -> Vec<(OperationType, Payload)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Locations of every call, in order.
    pub fn called_locations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .map(|(_, payload)| payload.location)
            .collect()
    }

    fn run<'a>(&'a self, op: OperationType, payload: &'a Payload) -> ExecutorFuture<'a> {
        Box::pin(async move {
            self.calls.lock().unwrap().push((op, payload.clone()));
            self.entered.notify_one();

            if let Some(gate) = &self.gate {
                gate.acquire().await.unwrap().forget();
            }

            let outcome = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| self.default.clone());

            match outcome {
                Outcome::Succeed => Ok(json!({ "ok": true })),
                Outcome::Fail(e) => Err(e),
                Outcome::Panic => panic!("mock executor exploded"),
                Outcome::Hang => std::future::pending().await,
            }
        })
    }
}

impl Executor for MockExecutor {
    fn check_in<'a>(&'a self, payload: &'a Payload) -> ExecutorFuture<'a> {
        self.run(OperationType::CheckIn, payload)
    }

    fn check_out<'a>(&'a self, payload: &'a Payload) -> ExecutorFuture<'a> {
        self.run(OperationType::CheckOut, payload)
    }
}

/// Memory store whose reads or writes can be made to fail.
#[derive(Default)]
pub struct FailingStore {
    pub inner: MemoryStore,
    fail_gets: AtomicBool,
    fail_sets: AtomicBool,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_gets(&self, fail: bool) {
        self.fail_gets.store(fail, Ordering::SeqCst);
    }

    pub fn fail_sets(&self, fail: bool) {
        self.fail_sets.store(fail, Ordering::SeqCst);
    }
}

impl DurableStore for FailingStore {
    fn get(&self, key: &str) -> StoreFuture<'_, Option<String>> {
        if self.fail_gets.load(Ordering::SeqCst) {
            return Box::pin(async { Err(Error::Store("read failed".into())) });
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: String) -> StoreFuture<'_, ()> {
        if self.fail_sets.load(Ordering::SeqCst) {
            return Box::pin(async { Err(Error::Store("write failed".into())) });
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> StoreFuture<'_, ()> {
        if self.fail_sets.load(Ordering::SeqCst) {
            return Box::pin(async { Err(Error::Store("write failed".into())) });
        }
        self.inner.remove(key)
    }
}

/// File store that pauses after every read, widening the window between a
/// read and the write that follows it.
pub struct SlowReadStore {
    pub inner: FileStore,
    pub delay: Duration,
}

impl DurableStore for SlowReadStore {
    fn get(&self, key: &str) -> StoreFuture<'_, Option<String>> {
        let read = self.inner.get(key);
        let delay = self.delay;
        Box::pin(async move {
            let value = read.await?;
            tokio::time::sleep(delay).await;
            Ok(value)
        })
    }

    fn set(&self, key: &str, value: String) -> StoreFuture<'_, ()> {
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> StoreFuture<'_, ()> {
        self.inner.remove(key)
    }

    fn lock(&self) -> StoreFuture<'_, StoreLease> {
        self.inner.lock()
    }
}

/// Manager with its own lock and flight over `store`, as a separate process
/// sharing the same storage would have.
pub fn manager_over(store: Arc<dyn DurableStore>) -> QueueManager {
    QueueManager::new(
        store,
        EventBus::new(64),
        Arc::new(SingleFlight::new()),
        crate::item::DEFAULT_MAX_RETRIES,
    )
}

/// Manager over a fresh memory store, with the store handle for inspection.
pub fn make_manager() -> (Arc<QueueManager>, Arc<MemoryStore>, EventBus) {
    let store = Arc::new(MemoryStore::new());
    let events = EventBus::new(64);
    let manager = Arc::new(QueueManager::new(
        Arc::clone(&store) as Arc<dyn DurableStore>,
        events.clone(),
        Arc::new(SingleFlight::new()),
        crate::item::DEFAULT_MAX_RETRIES,
    ));
    (manager, store, events)
}
