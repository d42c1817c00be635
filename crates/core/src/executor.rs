// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote operation executor abstraction.
//!
//! The executor performs the actual network call for a queued operation. Its
//! outcome is binary: a [`Receipt`] on success, an [`ExecutorError`] on
//! failure. This trait lets the processor run against a real HTTP client in
//! production and a scripted mock in tests.

use std::future::Future;
use std::pin::Pin;

use crate::item::{OperationType, Payload};

/// Error type for executor calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutorError {
    /// The request never got a response (DNS, refused, reset, ...).
    #[error("request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status.
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The call did not finish within the configured timeout.
    #[error("timed out after {0}ms")]
    Timeout(u64),

    /// The executor panicked while handling the call.
    #[error("executor panicked: {0}")]
    Panicked(String),

    /// No route exists for the operation type.
    #[error("unknown operation type: '{0}'")]
    UnknownOperation(String),
}

impl ExecutorError {
    /// Whether another attempt could plausibly succeed.
    ///
    /// An unknown operation type never will, so it is escalated at once
    /// instead of burning the retry budget.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ExecutorError::UnknownOperation(_))
    }
}

/// Result object returned by the remote service on success.
pub type Receipt = serde_json::Value;

/// Result type for executor calls.
pub type ExecutorResult<T> = Result<T, ExecutorError>;

/// Boxed future returned by [`Executor`] methods.
pub type ExecutorFuture<'a> = Pin<Box<dyn Future<Output = ExecutorResult<Receipt>> + Send + 'a>>;

/// Performs remote calls, one method per operation type.
pub trait Executor: Send + Sync {
    /// Submit a biometric check-in.
    fn check_in<'a>(&'a self, payload: &'a Payload) -> ExecutorFuture<'a>;

    /// Submit a biometric check-out.
    fn check_out<'a>(&'a self, payload: &'a Payload) -> ExecutorFuture<'a>;
}

/// Route an operation to the executor method for its type.
///
/// Unknown types fail deterministically without touching the executor.
pub fn dispatch<'a>(
    executor: &'a dyn Executor,
    operation_type: &OperationType,
    payload: &'a Payload,
) -> ExecutorFuture<'a> {
    match operation_type {
        OperationType::CheckIn => executor.check_in(payload),
        OperationType::CheckOut => executor.check_out(payload),
        OperationType::Other(other) => {
            let err = ExecutorError::UnknownOperation(other.clone());
            Box::pin(async move { Err(err) })
        }
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
