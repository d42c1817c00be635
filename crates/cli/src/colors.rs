// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal color utilities for help and command output.
//!
//! Respects environment variables:
//! - `NO_COLOR=1`: Disables colors
//! - `COLOR=1`: Forces colors even without TTY

use std::io::IsTerminal;

use crate::env;

/// ANSI 256-color codes.
pub mod codes {
    /// Section headers: pastel cyan/steel blue
    pub const HEADER: u8 = 74;
    /// Commands/literals: light grey
    pub const LITERAL: u8 = 250;
    /// Placeholders/context: medium grey
    pub const CONTEXT: u8 = 245;
    /// Delivered/healthy: soft green
    pub const GOOD: u8 = 114;
    /// Waiting for a retry: amber
    pub const WARN: u8 = 179;
    /// Dead-lettered: muted red
    pub const BAD: u8 = 167;
}

/// Check if colors should be enabled based on TTY and environment variables.
pub fn should_colorize() -> bool {
    if env::no_color() {
        return false;
    }
    if env::force_color() {
        return true;
    }
    std::io::stdout().is_terminal()
}

/// Format a 256-color ANSI escape sequence for foreground color.
fn fg256(code: u8) -> String {
    format!("\x1b[38;5;{code}m")
}

/// ANSI reset sequence.
const RESET: &str = "\x1b[0m";

fn paint(code: u8, text: &str) -> String {
    format!("{}{}{}", fg256(code), text, RESET)
}

/// Paint only when colors are enabled.
fn paint_if(code: u8, text: &str) -> String {
    if should_colorize() {
        paint(code, text)
    } else {
        text.to_string()
    }
}

/// Apply header color (section titles) to text.
pub fn header(text: &str) -> String {
    paint(codes::HEADER, text)
}

/// Apply literal color (commands, options) to text.
pub fn literal(text: &str) -> String {
    paint(codes::LITERAL, text)
}

/// Apply context color (placeholders, hints) to text.
pub fn context(text: &str) -> String {
    paint(codes::CONTEXT, text)
}

pub fn good(text: &str) -> String {
    paint_if(codes::GOOD, text)
}

pub fn warn(text: &str) -> String {
    paint_if(codes::WARN, text)
}

pub fn bad(text: &str) -> String {
    paint_if(codes::BAD, text)
}

/// Literal color for command output, such as operation ids.
pub fn value(text: &str) -> String {
    paint_if(codes::LITERAL, text)
}

pub fn dim(text: &str) -> String {
    paint_if(codes::CONTEXT, text)
}

/// Colorize an examples help block.
///
/// Lines ending in `:` are headers; in `  punch cmd <arg>    Description`
/// lines the command part is colored and the description left alone.
pub fn examples(text: &str) -> String {
    if !should_colorize() {
        return text.to_string();
    }

    let mut result = String::with_capacity(text.len() + 256);

    for line in text.lines() {
        if !result.is_empty() {
            result.push('\n');
        }

        let trimmed = line.trim_start();
        let indent = &line[..line.len() - trimmed.len()];

        if trimmed.ends_with(':') && !trimmed.contains("  ") {
            result.push_str(indent);
            result.push_str(&header(trimmed));
            continue;
        }

        if let Some(cmd_end) = find_description_start(trimmed) {
            result.push_str(indent);
            result.push_str(&colorize_command(&trimmed[..cmd_end]));
            result.push_str(&trimmed[cmd_end..]);
            continue;
        }

        result.push_str(line);
    }

    result
}

/// Colorize a command string: words as literal, `<placeholders>` as context.
pub fn colorize_command(cmd: &str) -> String {
    cmd.split(' ')
        .map(|word| {
            if word.is_empty() {
                String::new()
            } else if word.starts_with('<') && word.ends_with('>') {
                context(word)
            } else {
                literal(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Find where the description starts (after 2+ spaces following the command).
pub fn find_description_start(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let mut in_spaces = false;
    let mut space_start = 0;

    for (i, &b) in bytes.iter().enumerate() {
        if b == b' ' {
            if !in_spaces {
                in_spaces = true;
                space_start = i;
            }
        } else {
            if in_spaces && i - space_start >= 2 {
                return Some(space_start);
            }
            in_spaces = false;
        }
    }

    None
}

#[cfg(test)]
#[path = "colors_tests.rs"]
mod tests;
