// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queue item types.
//!
//! A [`QueueItem`] is one pending write operation in the active queue. When it
//! exhausts its retry budget it becomes a [`DeadLetterItem`]; a manual retry
//! turns it back into a fresh pending item with the same id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Retry ceiling given to items created without an explicit one.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Which remote call a queued operation maps to.
///
/// Stored as a plain string. Unrecognized strings are kept as
/// [`OperationType::Other`] so a list written by a newer client still loads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OperationType {
    /// Biometric check-in.
    CheckIn,
    /// Biometric check-out.
    CheckOut,
    /// A type this build does not know how to deliver.
    Other(String),
}

impl OperationType {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &str {
        match self {
            OperationType::CheckIn => "check-in",
            OperationType::CheckOut => "check-out",
            OperationType::Other(s) => s,
        }
    }

    /// Returns true if this build has an executor route for the type.
    pub fn is_known(&self) -> bool {
        !matches!(self, OperationType::Other(_))
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Strict parse for user input: unknown types are rejected.
impl FromStr for OperationType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match OperationType::from(s.to_string()) {
            OperationType::Other(other) => Err(Error::InvalidOperationType(other)),
            known => Ok(known),
        }
    }
}

impl From<String> for OperationType {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "check-in" | "checkin" | "check_in" => OperationType::CheckIn,
            "check-out" | "checkout" | "check_out" => OperationType::CheckOut,
            _ => OperationType::Other(s),
        }
    }
}

impl From<OperationType> for String {
    fn from(op: OperationType) -> Self {
        op.as_str().to_string()
    }
}

/// A write operation as handed to `enqueue`, before it is stamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub operation_type: OperationType,
    /// Reference to the captured image (path, URI or inline base64).
    pub image: String,
    /// Location string, typically `"<lat>,<lng>"`.
    pub location: String,
}

impl Operation {
    pub fn check_in(image: impl Into<String>, location: impl Into<String>) -> Self {
        Operation {
            operation_type: OperationType::CheckIn,
            image: image.into(),
            location: location.into(),
        }
    }

    pub fn check_out(image: impl Into<String>, location: impl Into<String>) -> Self {
        Operation {
            operation_type: OperationType::CheckOut,
            image: image.into(),
            location: location.into(),
        }
    }

    /// Checks the fields every executor route needs.
    pub fn validate(&self) -> Result<()> {
        if self.image.trim().is_empty() {
            return Err(Error::FieldEmpty { field: "image" });
        }
        if self.location.trim().is_empty() {
            return Err(Error::FieldEmpty { field: "location" });
        }
        Ok(())
    }
}

/// Operation data as persisted and handed to the executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    pub image: String,
    pub location: String,
    /// When the real-world event happened, not when it is transmitted.
    pub timestamp: DateTime<Utc>,
}

/// Lifecycle state of an item in the active queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Pending,
    Completed,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single pending write operation in the active queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueItem {
    pub id: String,
    pub operation_type: OperationType,
    pub payload: Payload,
    pub created_at: DateTime<Utc>,
    pub retry_count: u32,
    pub max_retries: u32,
    pub status: ItemStatus,
    /// Error from the most recent failed attempt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl QueueItem {
    /// Stamps an operation into a fresh pending item.
    ///
    /// `created_at` doubles as the payload timestamp: both are the moment the
    /// operation was accepted.
    pub fn new(id: String, op: Operation, created_at: DateTime<Utc>, max_retries: u32) -> Self {
        QueueItem {
            id,
            operation_type: op.operation_type,
            payload: Payload {
                image: op.image,
                location: op.location,
                timestamp: created_at,
            },
            created_at,
            retry_count: 0,
            max_retries,
            status: ItemStatus::Pending,
            last_error: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == ItemStatus::Pending
    }

    /// Records one failed delivery attempt.
    pub fn record_failure(&mut self, error: impl Into<String>) {
        self.retry_count = self.retry_count.saturating_add(1);
        self.last_error = Some(error.into());
    }

    /// Returns true once the retry budget is spent.
    pub fn is_exhausted(&self) -> bool {
        self.retry_count >= self.max_retries
    }

    /// Converts the item into its dead-letter form.
    pub fn into_dead_letter(self, failed_at: DateTime<Utc>) -> DeadLetterItem {
        DeadLetterItem {
            id: self.id,
            operation_type: self.operation_type,
            payload: self.payload,
            created_at: self.created_at,
            retry_count: self.retry_count,
            max_retries: self.max_retries,
            last_error: self.last_error,
            failed_at,
            status: FailedStatus::Failed,
        }
    }
}

/// Status marker carried by every dead-letter item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailedStatus {
    Failed,
}

/// A queue item that exhausted its retries and awaits manual intervention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadLetterItem {
    pub id: String,
    pub operation_type: OperationType,
    pub payload: Payload,
    pub created_at: DateTime<Utc>,
    pub retry_count: u32,
    pub max_retries: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    pub failed_at: DateTime<Utc>,
    pub status: FailedStatus,
}

impl DeadLetterItem {
    /// Turns the item back into a pending one with a fresh retry budget.
    ///
    /// The id and both timestamps are kept; the payload timestamp still
    /// describes when the real-world event occurred.
    pub fn revive(self) -> QueueItem {
        QueueItem {
            id: self.id,
            operation_type: self.operation_type,
            payload: self.payload,
            created_at: self.created_at,
            retry_count: 0,
            max_retries: self.max_retries,
            status: ItemStatus::Pending,
            last_error: None,
        }
    }
}

#[cfg(test)]
#[path = "item_tests.rs"]
mod tests;
