// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity monitor that probes the API host over TCP.
//!
//! Every interval the probe address is resolved and then connected to:
//! resolution success means a network is up (`is_connected`), a completed TCP
//! handshake means the service is reachable (`is_internet_reachable`).
//! Subscribers only hear about changes.

use std::sync::Arc;
use std::time::Duration;

use punch_core::{ConnectivityMonitor, ConnectivityState};
use tokio::net::{lookup_host, TcpStream};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Background TCP probe publishing [`ConnectivityState`].
#[derive(Debug)]
pub struct ProbeMonitor {
    tx: Arc<watch::Sender<ConnectivityState>>,
    task: JoinHandle<()>,
}

impl ProbeMonitor {
    /// Start probing `address` (`host:port`). Must be called within a tokio runtime.
    ///
    /// The state starts offline and the first probe runs immediately.
    pub fn start(address: String, interval: Duration, timeout: Duration) -> Self {
        let (tx, _) = watch::channel(ConnectivityState::OFFLINE);
        let tx = Arc::new(tx);
        let task = tokio::spawn(probe_loop(Arc::clone(&tx), address, interval, timeout));
        ProbeMonitor { tx, task }
    }

    pub fn current(&self) -> ConnectivityState {
        *self.tx.borrow()
    }
}

impl ConnectivityMonitor for ProbeMonitor {
    fn subscribe(&self) -> watch::Receiver<ConnectivityState> {
        self.tx.subscribe()
    }
}

impl Drop for ProbeMonitor {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn probe_loop(
    tx: Arc<watch::Sender<ConnectivityState>>,
    address: String,
    interval: Duration,
    timeout: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let state = probe(&address, timeout).await;
        let changed = tx.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
        if changed {
            tracing::info!(
                address = %address,
                connected = state.is_connected,
                reachable = state.is_internet_reachable,
                "connectivity changed"
            );
        }
    }
}

/// Probe `address` once.
pub async fn probe(address: &str, timeout: Duration) -> ConnectivityState {
    let addrs: Vec<_> = match tokio::time::timeout(timeout, lookup_host(address)).await {
        Ok(Ok(addrs)) => addrs.collect(),
        Ok(Err(e)) => {
            tracing::debug!(address, error = %e, "probe resolution failed");
            return ConnectivityState::OFFLINE;
        }
        Err(_) => {
            tracing::debug!(address, "probe resolution timed out");
            return ConnectivityState::OFFLINE;
        }
    };
    if addrs.is_empty() {
        return ConnectivityState::OFFLINE;
    }

    for addr in &addrs {
        match tokio::time::timeout(timeout, TcpStream::connect(addr)).await {
            Ok(Ok(_)) => return ConnectivityState::ONLINE,
            Ok(Err(e)) => tracing::debug!(%addr, error = %e, "probe connect failed"),
            Err(_) => tracing::debug!(%addr, "probe connect timed out"),
        }
    }

    ConnectivityState {
        is_connected: true,
        is_internet_reachable: false,
    }
}

#[cfg(test)]
#[path = "probe_tests.rs"]
mod tests;
