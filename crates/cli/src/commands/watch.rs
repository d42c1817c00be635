// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Foreground delivery loop.
//!
//! Holds the drain lock, follows the connectivity monitor so every
//! reconnect drains the queue, prints queue events as they happen, and
//! sweeps periodically while online to pick up items other processes
//! queued in the meantime (every `sweep_secs`, never when it is 0).

use std::future::Future;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use punch_core::{ConnectivityMonitor, Executor};
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{Instant, Interval, MissedTickBehavior};

use crate::display::format_event;
use crate::error::Result;

use super::Context;

/// Deliver until `shutdown` resolves.
pub async fn run(
    ctx: &Context,
    executor: Arc<dyn Executor>,
    monitor: &dyn ConnectivityMonitor,
    shutdown: impl Future<Output = ()>,
    out: &mut impl Write,
) -> Result<()> {
    let _lock = ctx.lock()?;
    let mut queue = ctx.queue(executor)?;
    let mut events = queue.subscribe();
    let connectivity = monitor.subscribe();
    queue.watch_connectivity(monitor);
    tracing::info!(state_dir = %ctx.state_dir.display(), "watching for connectivity");

    let mut sweep = sweep_interval(ctx.config.connectivity.sweep_secs);

    tokio::pin!(shutdown);
    let result = loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break Ok(()),
            event = events.recv() => match event {
                Ok(event) => {
                    if let Err(e) = writeln!(out, "{}", format_event(&event)) {
                        break Err(e.into());
                    }
                }
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "event output fell behind");
                }
                Err(RecvError::Closed) => break Ok(()),
            },
            _ = next_sweep(&mut sweep) => {
                if !connectivity.borrow().is_online() {
                    continue;
                }
                match queue.process_queue().await {
                    Ok(Some(report)) if report.visited > 0 => tracing::info!(
                        succeeded = report.succeeded,
                        retried = report.retried,
                        escalated = report.escalated,
                        "sweep finished"
                    ),
                    Ok(_) => {}
                    Err(e) => tracing::warn!(error = %e, "sweep failed"),
                }
            }
        }
    };

    queue.cleanup();
    while let Ok(event) = events.try_recv() {
        writeln!(out, "{}", format_event(&event))?;
    }
    tracing::info!("watch stopped");
    result
}

/// Periodic sweep timer; `None` when sweeps are disabled with 0.
fn sweep_interval(secs: u64) -> Option<Interval> {
    if secs == 0 {
        return None;
    }
    let every = Duration::from_secs(secs);
    let mut interval = tokio::time::interval_at(Instant::now() + every, every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    Some(interval)
}

async fn next_sweep(sweep: &mut Option<Interval>) {
    match sweep {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
