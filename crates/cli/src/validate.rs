// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

// Compile-time constant pattern, verified at test time.
static LOCATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(r"^\s*(-?\d{1,3}(?:\.\d+)?)\s*,\s*(-?\d{1,3}(?:\.\d+)?)\s*$") {
        Ok(re) => re,
        Err(_) => unreachable!("static regex pattern"),
    }
});

/// Validate a `<lat>,<lng>` location and return it without whitespace.
pub fn validate_location(raw: &str) -> Result<String> {
    let invalid = || Error::InvalidLocation(raw.to_string());

    let caps = LOCATION_RE.captures(raw).ok_or_else(invalid)?;
    let (lat, lng) = (&caps[1], &caps[2]);

    let in_range = |value: &str, limit: f64| value.parse::<f64>().is_ok_and(|v| v.abs() <= limit);
    if !in_range(lat, 90.0) || !in_range(lng, 180.0) {
        return Err(invalid());
    }

    Ok(format!("{},{}", lat, lng))
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
