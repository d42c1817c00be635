// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP delivery of queued operations.
//!
//! Each operation is a JSON POST to `<api url>/attendance/<type>` with body
//! `{image, location, timestamp}`. A 2xx response is success and its JSON body
//! (or `null` when empty) is the receipt. Anything else is a failure carrying
//! the status and the start of the response body.

use std::time::Duration;

use punch_core::{Executor, ExecutorError, ExecutorFuture, ExecutorResult, Payload, Receipt};
use reqwest::Url;

use crate::error::{Error, Result};

/// Longest response body kept in an error.
const MAX_ERROR_BODY: usize = 512;

const CHECK_IN_PATH: &str = "attendance/check-in";
const CHECK_OUT_PATH: &str = "attendance/check-out";

/// [`Executor`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    client: reqwest::Client,
    base: Url,
    token: Option<String>,
    timeout: Duration,
}

impl HttpExecutor {
    pub fn new(base: Url, timeout: Duration, token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("punch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(HttpExecutor {
            client,
            base: with_trailing_slash(base),
            token,
            timeout,
        })
    }

    /// Full URL for an endpoint path relative to the base.
    pub fn endpoint(&self, path: &str) -> ExecutorResult<Url> {
        self.base
            .join(path)
            .map_err(|e| ExecutorError::Request(format!("bad endpoint '{}': {}", path, e)))
    }

    async fn post(&self, path: &str, payload: &Payload) -> ExecutorResult<Receipt> {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, location = %payload.location, "posting operation");

        let mut request = self.client.post(url).json(payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| self.request_error(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.request_error(e))?;

        if !status.is_success() {
            return Err(ExecutorError::Status {
                status: status.as_u16(),
                body: truncate(&body, MAX_ERROR_BODY),
            });
        }

        if body.trim().is_empty() {
            return Ok(Receipt::Null);
        }
        Ok(serde_json::from_str(&body).unwrap_or(Receipt::String(body)))
    }

    fn request_error(&self, e: reqwest::Error) -> ExecutorError {
        if e.is_timeout() {
            ExecutorError::Timeout(u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX))
        } else {
            ExecutorError::Request(e.to_string())
        }
    }
}

impl Executor for HttpExecutor {
    fn check_in<'a>(&'a self, payload: &'a Payload) -> ExecutorFuture<'a> {
        Box::pin(self.post(CHECK_IN_PATH, payload))
    }

    fn check_out<'a>(&'a self, payload: &'a Payload) -> ExecutorFuture<'a> {
        Box::pin(self.post(CHECK_OUT_PATH, payload))
    }
}

/// `Url::join` replaces the last segment unless the base ends in `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
