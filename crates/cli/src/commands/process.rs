// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;
use std::sync::Arc;

use punch_core::Executor;

use crate::cli::OutputFormat;
use crate::display::format_report;
use crate::error::Result;

use super::{drain, print_json, Context};

/// Run one drain pass under the drain lock and report what happened.
pub async fn run(
    ctx: &Context,
    executor: Arc<dyn Executor>,
    output: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let queue = ctx.queue(executor)?;
    let report = drain(ctx, &queue).await?;
    tracing::info!(
        succeeded = report.succeeded,
        retried = report.retried,
        escalated = report.escalated,
        "drain pass finished"
    );

    match output {
        OutputFormat::Text => writeln!(out, "{}", format_report(&report))?,
        OutputFormat::Json => print_json(out, &report)?,
    }
    Ok(())
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
