// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for punch-core operations.

use thiserror::Error;

/// All possible errors that can occur in punch-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid operation type: '{0}'\n  hint: valid types are: check-in, check-out")]
    InvalidOperationType(String),

    #[error("{field} cannot be empty")]
    FieldEmpty { field: &'static str },

    #[error("store error: {0}")]
    Store(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for punch-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
