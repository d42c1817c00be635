// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! punchrs - command-line front end for the punch offline queue.
//!
//! This crate wires [`punch_core`] to the outside world for the `punch` CLI:
//! a file-backed queue under a state directory, an HTTP executor for the
//! attendance API, and a TCP probe as the connectivity monitor.
//!
//! # Main Components
//!
//! - [`Cli`] / [`Command`] - argument parsing
//! - [`Config`] - `config.toml` in the state directory
//! - [`HttpExecutor`] - delivers check-ins and check-outs over HTTP
//! - [`ProbeMonitor`] - reports connectivity by probing the API host
//! - [`Error`] - error type for every command
//!
//! # Running a command
//!
//! ```rust,ignore
//! use clap::Parser;
//! use punchrs::{run, Cli};
//!
//! run(Cli::parse())?;
//! ```

mod cli;
pub mod colors;
mod commands;
mod display;
pub mod env;
pub mod help;
mod lock;
mod validate;

pub mod config;
pub mod error;
pub mod http;
pub mod probe;

pub use cli::{Cli, Command, OutputFormat, RecordArgs};
pub use config::Config;
pub use error::{Error, Result};
pub use http::HttpExecutor;
pub use probe::ProbeMonitor;

use std::io::{self, Write};
use std::time::Duration;

use clap::CommandFactory;
use clap_complete::generate;
use punch_core::OperationType;

use commands::retry::RetryTarget;
use commands::Context;

/// Execute a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    if let Command::Completion { shell } = cli.command {
        generate(shell, &mut Cli::command(), "punch", &mut io::stdout());
        return Ok(());
    }

    let ctx = Context::load(cli.state_dir)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let mut stdout = io::stdout().lock();
    runtime.block_on(dispatch(&ctx, cli.command, &mut stdout))
}

async fn dispatch(ctx: &Context, command: Command, out: &mut impl Write) -> Result<()> {
    match command {
        Command::CheckIn(args) => record(ctx, OperationType::CheckIn, args, out).await,
        Command::CheckOut(args) => record(ctx, OperationType::CheckOut, args, out).await,
        Command::Process { output } => {
            commands::process::run(ctx, ctx.executor()?, output, out).await
        }
        Command::Status { output } => commands::inspect::status(ctx, output, out).await,
        Command::List { output } => commands::inspect::list(ctx, output, out).await,
        Command::Failed { output } => commands::inspect::failed(ctx, output, out).await,
        Command::Retry { id, all } => {
            let target = match id {
                Some(id) if !all => RetryTarget::One(id),
                _ => RetryTarget::All,
            };
            commands::retry::run(ctx, ctx.executor()?, target, out).await
        }
        Command::Clear { failed } => commands::clear::run(ctx, failed, out).await,
        Command::Watch => watch(ctx, out).await,
        Command::Completion { .. } => Ok(()),
    }
}

async fn record(
    ctx: &Context,
    operation_type: OperationType,
    args: RecordArgs,
    out: &mut impl Write,
) -> Result<()> {
    let executor = if args.sync {
        Some(ctx.executor()?)
    } else {
        None
    };
    commands::record::run(ctx, operation_type, &args, executor, out).await
}

async fn watch(ctx: &Context, out: &mut impl Write) -> Result<()> {
    let executor = ctx.executor()?;
    let address = ctx
        .config
        .probe_address()?
        .ok_or_else(|| Error::ApiNotConfigured {
            config: config::config_path(&ctx.state_dir).display().to_string(),
        })?;
    let settings = &ctx.config.connectivity;
    let monitor = ProbeMonitor::start(
        address,
        Duration::from_millis(settings.interval_ms),
        Duration::from_millis(settings.timeout_ms),
    );
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };
    commands::watch::run(ctx, executor, &monitor, shutdown, out).await
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
