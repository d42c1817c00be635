// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;
use std::sync::Arc;

use punch_core::{DrainReport, Executor, Operation, OperationType};
use serde::Serialize;

use crate::cli::{OutputFormat, RecordArgs};
use crate::colors;
use crate::display::format_report;
use crate::error::{Error, Result};

use super::{drain, print_json, Context};

#[derive(Serialize)]
struct RecordJson<'a> {
    id: &'a str,
    operation_type: &'a OperationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<DrainReport>,
}

/// Queue a check-in or check-out, optionally draining right away.
///
/// `executor` must be present when `args.sync` is set. A drain lock held by
/// another process only downgrades `--sync` to a warning: the operation is
/// already safely queued.
pub async fn run(
    ctx: &Context,
    operation_type: OperationType,
    args: &RecordArgs,
    executor: Option<Arc<dyn Executor>>,
    out: &mut impl Write,
) -> Result<()> {
    let op = Operation {
        operation_type: operation_type.clone(),
        image: args.image.clone(),
        location: args.location.clone(),
    };

    let (id, report) = match executor.filter(|_| args.sync) {
        Some(executor) => {
            let queue = ctx.queue(executor)?;
            let id = queue.enqueue(op).await?;
            let report = match drain(ctx, &queue).await {
                Ok(report) => Some(report),
                Err(Error::DrainLocked) => {
                    eprintln!(
                        "warning: another punch process is delivering; {} stays queued",
                        id
                    );
                    None
                }
                Err(e) => return Err(e),
            };
            (id, report)
        }
        None => (ctx.manager()?.enqueue(op).await?, None),
    };

    match args.output {
        OutputFormat::Text => {
            writeln!(
                out,
                "Queued {} {}",
                operation_type,
                colors::value(&id)
            )?;
            if let Some(report) = &report {
                writeln!(out, "{}", format_report(report))?;
            }
        }
        OutputFormat::Json => print_json(
            out,
            &RecordJson {
                id: &id,
                operation_type: &operation_type,
                report,
            },
        )?,
    }
    Ok(())
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
