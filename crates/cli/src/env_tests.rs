// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;

// Each test uses its own variable where it can, since tests run in parallel
// within one process.

#[test]
fn test_vars_constants() {
    assert_eq!(vars::NO_COLOR, "NO_COLOR");
    assert_eq!(vars::COLOR, "COLOR");
    assert_eq!(vars::PUNCH_STATE_DIR, "PUNCH_STATE_DIR");
    assert_eq!(vars::XDG_STATE_HOME, "XDG_STATE_HOME");
    assert_eq!(vars::PUNCH_API_URL, "PUNCH_API_URL");
    assert_eq!(vars::PUNCH_API_TOKEN, "PUNCH_API_TOKEN");
}

#[test]
fn test_no_color_values() {
    std::env::remove_var("NO_COLOR");
    assert!(!no_color());
    std::env::set_var("NO_COLOR", "true");
    assert!(!no_color());
    std::env::set_var("NO_COLOR", "1");
    assert!(no_color());
    std::env::remove_var("NO_COLOR");
}

#[test]
fn test_force_color_values() {
    std::env::remove_var("COLOR");
    assert!(!force_color());
    std::env::set_var("COLOR", "1");
    assert!(force_color());
    std::env::remove_var("COLOR");
}

#[test]
fn test_state_dir() {
    std::env::set_var("PUNCH_STATE_DIR", "/tmp/punch-test-state");
    assert_eq!(state_dir(), Some(PathBuf::from("/tmp/punch-test-state")));
    std::env::set_var("PUNCH_STATE_DIR", "");
    assert_eq!(state_dir(), None);
    std::env::remove_var("PUNCH_STATE_DIR");
    assert_eq!(state_dir(), None);
}

#[test]
fn test_xdg_state_home() {
    std::env::set_var("XDG_STATE_HOME", "/tmp/xdg-state");
    assert_eq!(xdg_state_home(), Some(PathBuf::from("/tmp/xdg-state")));
    std::env::remove_var("XDG_STATE_HOME");
    assert_eq!(xdg_state_home(), None);
}

#[test]
fn test_api_url() {
    std::env::set_var("PUNCH_API_URL", "http://localhost:8080");
    assert_eq!(api_url().as_deref(), Some("http://localhost:8080"));
    std::env::remove_var("PUNCH_API_URL");
    assert_eq!(api_url(), None);
}

#[test]
fn test_api_token_reads_named_variable() {
    std::env::set_var("PUNCH_TEST_TOKEN_VAR", "secret");
    assert_eq!(api_token("PUNCH_TEST_TOKEN_VAR").as_deref(), Some("secret"));
    std::env::remove_var("PUNCH_TEST_TOKEN_VAR");
    assert_eq!(api_token("PUNCH_TEST_TOKEN_VAR"), None);
}
