// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity state and the monitor interface.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Network state as reported by a [`ConnectivityMonitor`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivityState {
    /// A network interface is up.
    pub is_connected: bool,
    /// The remote service is reachable through it.
    pub is_internet_reachable: bool,
}

impl ConnectivityState {
    pub const OFFLINE: ConnectivityState = ConnectivityState {
        is_connected: false,
        is_internet_reachable: false,
    };

    pub const ONLINE: ConnectivityState = ConnectivityState {
        is_connected: true,
        is_internet_reachable: true,
    };

    /// Connected and reachable: the only state worth draining in.
    pub fn is_online(&self) -> bool {
        self.is_connected && self.is_internet_reachable
    }
}

/// Source of connectivity changes.
///
/// The receiver yields the current state immediately and every change after
/// that. When the monitor goes away the receiver's `changed()` errors, which
/// simply stops automatic triggering.
pub trait ConnectivityMonitor: Send + Sync {
    fn subscribe(&self) -> watch::Receiver<ConnectivityState>;
}

/// Monitor driven by hand: by tests, or by a host platform that pushes its
/// own network callbacks in.
#[derive(Debug)]
pub struct ManualConnectivity {
    tx: watch::Sender<ConnectivityState>,
}

impl ManualConnectivity {
    pub fn new(initial: ConnectivityState) -> Self {
        let (tx, _) = watch::channel(initial);
        ManualConnectivity { tx }
    }

    /// Publish a new state. Subscribers are only woken if it differs.
    pub fn set(&self, state: ConnectivityState) {
        self.tx.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
    }

    pub fn current(&self) -> ConnectivityState {
        *self.tx.borrow()
    }
}

impl ConnectivityMonitor for ManualConnectivity {
    fn subscribe(&self) -> watch::Receiver<ConnectivityState> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
#[path = "connectivity_tests.rs"]
mod tests;
