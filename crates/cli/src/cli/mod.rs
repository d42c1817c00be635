// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use crate::colors;
use crate::help;
use crate::validate::validate_location;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

fn location(s: &str) -> Result<String, String> {
    validate_location(s).map_err(|e| e.to_string())
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "punch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(disable_version_flag = true)]
#[command(about = "Offline-first attendance queue: record now, deliver when the network allows")]
#[command(help_template = help::template())]
#[command(before_help = help::commands())]
#[command(after_help = help::quickstart())]
#[command(styles = help::styles())]
// Allow the unit type field pattern which is required for clap's ArgAction::Version/Help
#[allow(clippy::manual_non_exhaustive)]
pub struct Cli {
    /// Directory holding the queue, config.toml and the drain lock
    #[arg(long, global = true, value_name = "dir")]
    pub state_dir: Option<PathBuf>,

    /// Print version
    #[arg(short = 'v', short_alias = 'V', long = "version", action = clap::ArgAction::Version)]
    version: (),

    #[command(subcommand)]
    pub command: Command,
}

/// Arguments shared by check-in and check-out.
#[derive(Args, Clone, Debug)]
pub struct RecordArgs {
    /// Biometric image reference (base64 data or a reference understood by the server)
    #[arg(long, value_parser = non_empty_string)]
    pub image: String,

    /// Where the operation happened, as <lat>,<lng>
    #[arg(long, short = 'l', value_parser = location, allow_hyphen_values = true)]
    pub location: String,

    /// Run a drain pass right after queueing
    #[arg(long)]
    pub sync: bool,

    /// Output format (text, json)
    #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
    pub output: OutputFormat,
}

#[derive(Subcommand)]
pub enum Command {
    /// Queue a check-in
    #[command(after_help = colors::examples("\
Examples:
  punch check-in --image <ref> -l 32.08,34.78          Queue a check-in
  punch check-in --image <ref> -l 32.08,34.78 --sync   Queue and deliver now"))]
    CheckIn(RecordArgs),

    /// Queue a check-out
    CheckOut(RecordArgs),

    /// Run one drain pass now
    Process {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Show queue counts
    Status {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// List queued operations
    List {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// List operations that ran out of retries
    Failed {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Move failed operations back into the queue and deliver them
    #[command(after_help = colors::examples("\
Examples:
  punch retry <id>     Retry one failed operation
  punch retry --all    Retry every failed operation"))]
    Retry {
        /// Failed operation to retry
        #[arg(required_unless_present = "all")]
        id: Option<String>,

        /// Retry every failed operation
        #[arg(long, conflicts_with = "id")]
        all: bool,
    },

    /// Erase the queue, or the failed list with --failed
    Clear {
        /// Erase the failed list instead of the queue
        #[arg(long)]
        failed: bool,
    },

    /// Deliver automatically whenever the network returns (Ctrl-C to stop)
    Watch,

    /// Generate shell completions
    #[command(arg_required_else_help = true)]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Command {
    /// Long-running commands log at info by default.
    pub fn is_long_running(&self) -> bool {
        matches!(self, Command::Watch)
    }
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
