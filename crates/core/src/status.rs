// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use serde::Serialize;
use std::fmt;

/// Point-in-time snapshot of the queues. Not a subscription.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueueStatus {
    /// Active-queue items still waiting for delivery.
    pub pending: usize,
    /// Whether a drain pass is in flight.
    pub processing: bool,
    /// Size of the dead-letter queue.
    pub failed: usize,
    /// Size of the active queue.
    pub total: usize,
}

impl QueueStatus {
    /// True when operations are stuck and the user should be prompted to retry.
    pub fn needs_attention(&self) -> bool {
        self.failed > 0
    }
}

impl fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pending: {}, processing: {}, failed: {}, total: {}",
            self.pending, self.processing, self.failed, self.total
        )
    }
}
