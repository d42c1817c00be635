// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Help text generation with colorization support.

use crate::colors;
use clap::builder::styling::Styles;

/// Generate clap Styles for help output.
pub fn styles() -> Styles {
    if !colors::should_colorize() {
        return Styles::plain();
    }

    use anstyle::{Ansi256Color, Color, Style};

    let header = Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(colors::codes::HEADER))));
    let literal = Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(colors::codes::LITERAL))));
    let context = Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(colors::codes::CONTEXT))));

    Styles::styled()
        .header(header)
        .usage(header)
        .literal(literal)
        .placeholder(context)
        .valid(context)
}

/// Main help template with colorized Options header.
pub fn template() -> String {
    format!(
        "{{about-with-newline}}
{{usage-heading}} {{usage}}

{{before-help}}{}
{{options}}{{after-help}}",
        colors::header("Options:")
    )
}

/// Commands list shown before options in main help.
pub fn commands() -> String {
    format!(
        "\
{header_record}
  {check_in}    Queue a check-in
  {check_out}   Queue a check-out

{header_deliver}
  {process}     Run one drain pass now
  {watch}       Drain automatically whenever the network returns
  {retry}       Move failed operations back into the queue

{header_inspect}
  {status}      Show queue counts
  {list}        List queued operations
  {failed}      List operations that ran out of retries
  {clear}       Erase the queue or the failed list
  {completion}  Generate shell completions
",
        header_record = colors::header("Record:"),
        header_deliver = colors::header("Deliver:"),
        header_inspect = colors::header("Inspect:"),
        check_in = colors::literal("check-in"),
        check_out = colors::literal("check-out"),
        process = colors::literal("process"),
        watch = colors::literal("watch"),
        retry = colors::literal("retry"),
        status = colors::literal("status"),
        list = colors::literal("list"),
        failed = colors::literal("failed"),
        clear = colors::literal("clear"),
        completion = colors::literal("completion"),
    )
}

/// Quickstart help shown after options in main help.
pub fn quickstart() -> String {
    colors::examples(
        "\
Get started:
  punch check-in --image <ref> --location 32.08,34.78   Record a check-in
  punch status                                         See what is waiting
  punch process                                        Deliver now
  punch watch                                          Deliver whenever online",
    )
}

#[cfg(test)]
#[path = "help_tests.rs"]
mod tests;
