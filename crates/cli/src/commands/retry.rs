// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;
use std::sync::Arc;

use punch_core::Executor;

use crate::colors;
use crate::display::excerpt;
use crate::error::{Error, Result};

use super::Context;

/// Which dead-letter items to move back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryTarget {
    One(String),
    All,
}

/// Requeue failed operations and attempt delivery immediately.
pub async fn run(
    ctx: &Context,
    executor: Arc<dyn Executor>,
    target: RetryTarget,
    out: &mut impl Write,
) -> Result<()> {
    let _lock = ctx.lock()?;
    let queue = ctx.queue(executor)?;

    match target {
        RetryTarget::One(id) => {
            if !queue.retry_failed_item(&id).await? {
                return Err(Error::FailedItemNotFound(id));
            }
            let failed = queue.get_failed_queue().await?;
            if let Some(item) = failed.iter().find(|i| i.id == id) {
                let error = item.last_error.as_deref().unwrap_or("unknown error");
                writeln!(
                    out,
                    "{} {} failed again: {}",
                    colors::bad("Retry failed:"),
                    colors::value(&id),
                    excerpt(error)
                )?;
                return Ok(());
            }
            let active = queue.get_queue().await?;
            match active.iter().find(|i| i.id == id) {
                Some(item) => writeln!(
                    out,
                    "{} {} (attempt {}/{})",
                    colors::warn("Will retry"),
                    colors::value(&id),
                    item.retry_count,
                    item.max_retries
                )?,
                None => writeln!(out, "{} {}", colors::good("Delivered"), colors::value(&id))?,
            }
        }
        RetryTarget::All => {
            let requeued = queue.retry_all_failed().await?;
            if requeued == 0 {
                writeln!(out, "No failed operations")?;
                return Ok(());
            }
            let status = queue.get_queue_status().await?;
            writeln!(
                out,
                "Requeued {} failed operation{}; {} pending, {} failed",
                requeued,
                super::clear::plural(requeued),
                status.pending,
                status.failed
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
