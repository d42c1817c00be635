// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Completion command specs.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

fn punch() -> Command {
    cargo_bin_cmd!("punch")
}

#[yare::parameterized(
    bash = { "bash" },
    zsh = { "zsh" },
    fish = { "fish" },
)]
fn completion_generates_non_empty_output(shell: &str) {
    let output = punch().args(["completion", shell]).output().unwrap();

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.is_empty(), "Completion output should not be empty");
}

#[test]
fn completion_bash_references_subcommands() {
    let output = punch().args(["completion", "bash"]).output().unwrap();

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("_punch"));
    for command in ["check-in", "check-out", "process", "retry", "watch"] {
        assert!(stdout.contains(command), "missing {}", command);
    }
}

#[test]
fn completion_zsh_has_compdef() {
    let output = punch().args(["completion", "zsh"]).output().unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("#compdef punch"));
}

#[test]
fn completion_needs_no_state_dir() {
    punch()
        .args(["completion", "fish"])
        .env_remove("PUNCH_STATE_DIR")
        .env_remove("XDG_STATE_HOME")
        .env_remove("HOME")
        .assert()
        .success();
}

#[test]
fn completion_invalid_shell_fails() {
    punch()
        .args(["completion", "invalid_shell"])
        .assert()
        .failure();
}
