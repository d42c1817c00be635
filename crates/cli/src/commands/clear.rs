// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use crate::error::Result;

use super::Context;

/// Erase the active queue, or the dead-letter queue when `failed` is set.
pub async fn run(ctx: &Context, failed: bool, out: &mut impl Write) -> Result<()> {
    let manager = ctx.manager()?;
    if failed {
        let count = manager.get_failed_queue().await?.len();
        manager.clear_failed_queue().await?;
        writeln!(out, "Cleared {} failed operation{}", count, plural(count))?;
    } else {
        let count = manager.get_queue().await?.len();
        manager.clear_queue().await?;
        writeln!(out, "Cleared {} queued operation{}", count, plural(count))?;
    }
    Ok(())
}

pub(crate) fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
#[path = "clear_tests.rs"]
mod tests;
