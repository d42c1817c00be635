// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::item::OperationType;

/// Prefix shared by every queue item id.
pub const ID_PREFIX: &str = "op";

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generate an item ID from the operation and its enqueue time.
/// Format: op-{hash} where hash is the first 12 hex chars of
/// SHA256(type + location + timestamp + pid + sequence)
pub fn generate_id(op_type: &OperationType, location: &str, created_at: &DateTime<Utc>) -> String {
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let input = format!(
        "{}|{}|{}|{}|{}",
        op_type,
        location,
        // Microseconds cover every representable date; the sequence keeps
        // ids apart within the same microsecond.
        created_at.timestamp_micros(),
        std::process::id(),
        seq
    );
    let hash = Sha256::digest(input.as_bytes());
    format!("{}-{}", ID_PREFIX, hex::encode(&hash[..6]))
}

/// Generate a unique ID, handling collisions by appending incrementing suffix.
pub fn generate_unique_id<F>(
    op_type: &OperationType,
    location: &str,
    created_at: &DateTime<Utc>,
    exists: F,
) -> String
where
    F: Fn(&str) -> bool,
{
    let base_id = generate_id(op_type, location, created_at);

    if !exists(&base_id) {
        return base_id;
    }

    let mut suffix = 2;
    loop {
        let id = format!("{}-{}", base_id, suffix);
        if !exists(&id) {
            return id;
        }
        suffix += 1;
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
