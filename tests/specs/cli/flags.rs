// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Global flag, help and version specs.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn punch() -> Command {
    let mut cmd = cargo_bin_cmd!("punch");
    cmd.env("NO_COLOR", "1").env_remove("COLOR");
    cmd
}

#[yare::parameterized(
    short = { "-v" },
    upper = { "-V" },
    long = { "--version" },
)]
fn version_flags(flag: &str) {
    punch()
        .arg(flag)
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn help_lists_command_groups() {
    punch()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check-in"))
        .stdout(predicate::str::contains("retry"))
        .stdout(predicate::str::contains("watch"));
}

#[test]
fn no_command_shows_usage() {
    punch().assert().failure();
}

#[test]
fn state_dir_env_is_used() {
    let temp = TempDir::new().unwrap();

    punch()
        .env("PUNCH_STATE_DIR", temp.path())
        .args(["check-in", "--image", "img-ref", "-l", "1,2"])
        .assert()
        .success();

    punch()
        .env("PUNCH_STATE_DIR", temp.path())
        .arg("list")
        .assert()
        .stdout(predicate::str::contains("@ 1,2"));
}

#[test]
fn state_dir_flag_wins_over_env() {
    let from_env = TempDir::new().unwrap();
    let from_flag = TempDir::new().unwrap();

    punch()
        .env("PUNCH_STATE_DIR", from_env.path())
        .args(["--state-dir"])
        .arg(from_flag.path())
        .args(["check-in", "--image", "img-ref", "-l", "1,2"])
        .assert()
        .success();

    punch()
        .env("PUNCH_STATE_DIR", from_env.path())
        .arg("list")
        .assert()
        .stdout("Queue is empty\n");
}

#[test]
fn malformed_config_is_reported() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("config.toml"), "[api\nurl = ").unwrap();

    punch()
        .arg("--state-dir")
        .arg(temp.path())
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config error"));
}
