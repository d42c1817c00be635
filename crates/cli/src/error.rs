// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// All errors surfaced by the punch CLI.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Queue(#[from] punch_core::Error),

    #[error("invalid location: '{0}'\n  hint: use decimal '<lat>,<lng>', e.g. 32.08,34.78")]
    InvalidLocation(String),

    #[error("failed operation not found: {0}\n  hint: run 'punch failed' to list failed operations")]
    FailedItemNotFound(String),

    #[error("another process is draining the queue\n  hint: wait for it to finish, or stop 'punch watch'")]
    DrainLocked,

    #[error("no API url configured\n  hint: set [api] url in {config} or export PUNCH_API_URL")]
    ApiNotConfigured { config: String },

    #[error("invalid API url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid probe address '{0}'\n  hint: use host:port, e.g. api.example.com:443")]
    InvalidProbe(String),

    #[error("cannot determine state directory\n  hint: pass --state-dir or set PUNCH_STATE_DIR")]
    NoStateDir,

    #[error("http client error: {0}")]
    Http(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
