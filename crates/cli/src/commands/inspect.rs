// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only views of the queue: `status`, `list` and `failed`.

use std::io::Write;

use chrono::Utc;
use punch_core::{DeadLetterItem, QueueItem};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::colors;
use crate::display::{format_failed_line, format_item_line, format_status};
use crate::error::Result;
use crate::lock::DrainLock;

use super::{print_json, Context};

#[derive(Serialize)]
struct ItemsJson<'a, T> {
    items: &'a [T],
}

/// Print pending/failed/total counts.
///
/// `processing` reflects a drain pass in any process, seen through the
/// drain lock.
pub async fn status(ctx: &Context, output: OutputFormat, out: &mut impl Write) -> Result<()> {
    let mut status = ctx.manager()?.status().await?;
    status.processing = status.processing || DrainLock::is_held(&ctx.state_dir);

    match output {
        OutputFormat::Text => {
            writeln!(out, "{}", format_status(&status))?;
            if status.needs_attention() {
                writeln!(out)?;
                print_retry_hint(out)?;
            }
        }
        OutputFormat::Json => print_json(out, &status)?,
    }
    Ok(())
}

/// Print the active queue in delivery order.
pub async fn list(ctx: &Context, output: OutputFormat, out: &mut impl Write) -> Result<()> {
    let items = ctx.manager()?.get_queue().await?;

    match output {
        OutputFormat::Text => print_items(out, &items)?,
        OutputFormat::Json => print_json(out, &ItemsJson { items: &items })?,
    }
    Ok(())
}

fn print_items(out: &mut impl Write, items: &[QueueItem]) -> Result<()> {
    if items.is_empty() {
        writeln!(out, "Queue is empty")?;
        return Ok(());
    }
    let now = Utc::now();
    for item in items {
        writeln!(out, "{}", format_item_line(item, now))?;
    }
    Ok(())
}

/// Print the dead-letter queue with a hint on how to retry.
pub async fn failed(ctx: &Context, output: OutputFormat, out: &mut impl Write) -> Result<()> {
    let items = ctx.manager()?.get_failed_queue().await?;

    match output {
        OutputFormat::Text => print_failed(out, &items)?,
        OutputFormat::Json => print_json(out, &ItemsJson { items: &items })?,
    }
    Ok(())
}

fn print_failed(out: &mut impl Write, items: &[DeadLetterItem]) -> Result<()> {
    if items.is_empty() {
        writeln!(out, "No failed operations")?;
        return Ok(());
    }
    let now = Utc::now();
    for item in items {
        writeln!(out, "{}", format_failed_line(item, now))?;
    }
    writeln!(out)?;
    print_retry_hint(out)
}

fn print_retry_hint(out: &mut impl Write) -> Result<()> {
    writeln!(
        out,
        "{} {}",
        colors::dim("Retry with"),
        colors::value("punch retry <id>  |  punch retry --all")
    )?;
    Ok(())
}

#[cfg(test)]
#[path = "inspect_tests.rs"]
mod tests;
