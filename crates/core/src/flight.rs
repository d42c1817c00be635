// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Single-flight guard for drain passes.
//!
//! At most one [`FlightGuard`] exists per [`SingleFlight`] at any time. The
//! guard clears the flag when dropped, so a pass that returns early, errors
//! or unwinds cannot leave the flag stuck.

use std::sync::atomic::{AtomicBool, Ordering};

/// Tracks whether a drain pass is in flight.
#[derive(Debug, Default)]
pub struct SingleFlight {
    running: AtomicBool,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the flight, or `None` if a pass is already running.
    pub fn try_begin(&self) -> Option<FlightGuard<'_>> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlightGuard { flight: self })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Proof that the holder owns the current drain pass.
#[derive(Debug)]
pub struct FlightGuard<'a> {
    flight: &'a SingleFlight,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.flight.running.store(false, Ordering::Release);
    }
}

#[cfg(test)]
#[path = "flight_tests.rs"]
mod tests;
