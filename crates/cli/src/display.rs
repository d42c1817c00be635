// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{DateTime, Utc};
use punch_core::{DeadLetterItem, DrainReport, QueueEvent, QueueItem, QueueStatus};

use crate::colors;

/// Longest error excerpt shown on one line.
const ERROR_EXCERPT: usize = 80;

/// Human-readable age, e.g. "just now", "5m ago", "3h ago", "2d ago".
pub fn format_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds().max(0);
    match secs {
        0..=59 => "just now".to_string(),
        60..=3_599 => format!("{}m ago", secs / 60),
        3_600..=86_399 => format!("{}h ago", secs / 3_600),
        _ => format!("{}d ago", secs / 86_400),
    }
}

/// Shorten an error for single-line display.
pub fn excerpt(text: &str) -> String {
    let first_line = text.lines().next().unwrap_or_default();
    if first_line.chars().count() <= ERROR_EXCERPT {
        return first_line.to_string();
    }
    let cut: String = first_line.chars().take(ERROR_EXCERPT - 3).collect();
    format!("{}...", cut)
}

/// One line per queued operation:
/// `- [check-in] op-1a2b3c4d5e6f @ 32.08,34.78 (5m ago, retry 1/3)`
pub fn format_item_line(item: &QueueItem, now: DateTime<Utc>) -> String {
    let mut line = format!(
        "- [{}] {} @ {} ({}",
        item.operation_type,
        item.id,
        item.payload.location,
        format_age(item.created_at, now)
    );
    if item.retry_count > 0 {
        let retries = format!("retry {}/{}", item.retry_count, item.max_retries);
        line.push_str(", ");
        line.push_str(&colors::warn(&retries));
    }
    if !item.is_pending() {
        line.push_str(", ");
        line.push_str(&colors::dim(item.status.as_str()));
    }
    line.push(')');
    if let Some(error) = &item.last_error {
        line.push_str("\n    ");
        line.push_str(&colors::dim(&format!("last error: {}", excerpt(error))));
    }
    line
}

/// One line per dead-letter item, with the error that sent it there.
pub fn format_failed_line(item: &DeadLetterItem, now: DateTime<Utc>) -> String {
    let mut line = format!(
        "- [{}] {} @ {} ({}, failed {} after {} attempts)",
        item.operation_type,
        item.id,
        item.payload.location,
        format_age(item.created_at, now),
        format_age(item.failed_at, now),
        item.retry_count
    );
    if let Some(error) = &item.last_error {
        line.push_str("\n    ");
        line.push_str(&colors::bad(&excerpt(error)));
    }
    line
}

/// Multi-line queue summary.
pub fn format_status(status: &QueueStatus) -> String {
    let failed = status.failed.to_string();
    let failed = if status.failed > 0 {
        colors::bad(&failed)
    } else {
        failed
    };
    let mut out = format!(
        "Pending:    {}\nFailed:     {}\nTotal:      {}",
        status.pending, failed, status.total
    );
    if status.processing {
        out.push_str("\nProcessing: yes");
    }
    out
}

/// One-line drain pass summary.
pub fn format_report(report: &DrainReport) -> String {
    if report.visited == 0 {
        return "Queue empty, nothing to deliver".to_string();
    }
    let mut parts = vec![colors::good(&format!("{} delivered", report.succeeded))];
    if report.retried > 0 {
        parts.push(colors::warn(&format!("{} will retry", report.retried)));
    }
    if report.escalated > 0 {
        parts.push(colors::bad(&format!("{} failed", report.escalated)));
    }
    if report.skipped > 0 {
        parts.push(colors::dim(&format!("{} skipped", report.skipped)));
    }
    parts.join(", ")
}

/// One line per event, as `punch watch` prints them.
pub fn format_event(event: &QueueEvent) -> String {
    let message = event.message();
    let message = match event {
        QueueEvent::Succeeded { .. } => colors::good(&message),
        QueueEvent::RetryScheduled { .. } => colors::warn(&message),
        QueueEvent::Escalated { .. } => colors::bad(&message),
        QueueEvent::Enqueued { .. } | QueueEvent::Requeued { .. } => message,
    };
    format!("{} {}", colors::dim(event.id()), message)
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
