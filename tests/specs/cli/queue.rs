// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end specs for recording, inspecting and delivering operations.
//!
//! Delivery specs point the API at 127.0.0.1:9, where nothing listens, so
//! every attempt fails fast with a refused connection.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use yare::parameterized;

const DEAD_API: &str = "http://127.0.0.1:9";

/// `punch` isolated to `temp` with no API configured and colors off.
fn punch(temp: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("punch");
    cmd.arg("--state-dir")
        .arg(temp.path())
        .env_remove("PUNCH_STATE_DIR")
        .env_remove("PUNCH_API_URL")
        .env_remove("PUNCH_API_TOKEN")
        .env_remove("COLOR")
        .env("NO_COLOR", "1");
    cmd
}

/// `punch` whose API refuses every connection.
fn punch_offline(temp: &TempDir) -> Command {
    let mut cmd = punch(temp);
    cmd.env("PUNCH_API_URL", DEAD_API);
    cmd
}

fn check_in(temp: &TempDir, location: &str) -> String {
    let output = punch(temp)
        .args(["check-in", "--image", "img-ref", "-l", location, "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    value["id"].as_str().unwrap().to_string()
}

fn status_json(temp: &TempDir) -> serde_json::Value {
    let output = punch(temp).args(["status", "-o", "json"]).output().unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

// =============================================================================
// Recording
// =============================================================================

#[test]
fn check_in_works_without_api() {
    let temp = TempDir::new().unwrap();

    punch(&temp)
        .args(["check-in", "--image", "img-ref", "-l", "32.08,34.78"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Queued check-in "));

    punch(&temp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("[check-in]"))
        .stdout(predicate::str::contains("@ 32.08,34.78"));
}

#[test]
fn check_out_is_recorded_as_check_out() {
    let temp = TempDir::new().unwrap();

    punch(&temp)
        .args(["check-out", "--image", "img-ref", "-l", "1,2"])
        .assert()
        .success();

    punch(&temp)
        .arg("list")
        .assert()
        .stdout(predicate::str::contains("[check-out]"));
}

#[test]
fn negative_coordinates_are_accepted() {
    let temp = TempDir::new().unwrap();

    punch(&temp)
        .args(["check-in", "--image", "img-ref", "-l", "-33.86,-151.2"])
        .assert()
        .success();
}

#[parameterized(
    empty = { "" },
    one_number = { "32.08" },
    words = { "home" },
    latitude_out_of_range = { "91,0" },
    longitude_out_of_range = { "0,181" },
)]
fn invalid_location_is_rejected(location: &str) {
    let temp = TempDir::new().unwrap();

    punch(&temp)
        .args(["check-in", "--image", "img-ref", "-l", location])
        .assert()
        .failure();

    assert_eq!(status_json(&temp)["total"], 0);
}

#[test]
fn empty_image_is_rejected() {
    let temp = TempDir::new().unwrap();

    punch(&temp)
        .args(["check-in", "--image", "  ", "-l", "1,2"])
        .assert()
        .failure();
}

// =============================================================================
// Inspection
// =============================================================================

#[test]
fn status_of_empty_state_dir() {
    let temp = TempDir::new().unwrap();

    punch(&temp)
        .arg("status")
        .assert()
        .success()
        .stdout("Pending:    0\nFailed:     0\nTotal:      0\n");
}

#[test]
fn status_counts_queued_operations() {
    let temp = TempDir::new().unwrap();
    check_in(&temp, "1,1");
    check_in(&temp, "2,2");

    let status = status_json(&temp);
    assert_eq!(status["pending"], 2);
    assert_eq!(status["failed"], 0);
    assert_eq!(status["total"], 2);
    assert_eq!(status["processing"], false);
}

#[test]
fn list_preserves_order() {
    let temp = TempDir::new().unwrap();
    let first = check_in(&temp, "1,1");
    let second = check_in(&temp, "2,2");

    let output = punch(&temp).args(["list", "-o", "json"]).output().unwrap();
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let ids: Vec<&str> = value["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![first.as_str(), second.as_str()]);
}

#[test]
fn queue_survives_between_invocations() {
    let temp = TempDir::new().unwrap();
    let id = check_in(&temp, "1,1");

    punch(&temp)
        .arg("list")
        .assert()
        .stdout(predicate::str::contains(id));
}

// =============================================================================
// Delivery
// =============================================================================

#[test]
fn process_without_api_explains_how_to_configure() {
    let temp = TempDir::new().unwrap();
    check_in(&temp, "1,1");

    punch(&temp)
        .arg("process")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no API url configured"))
        .stderr(predicate::str::contains("PUNCH_API_URL"));
}

#[test]
fn process_on_empty_queue() {
    let temp = TempDir::new().unwrap();

    punch_offline(&temp)
        .arg("process")
        .assert()
        .success()
        .stdout("Queue empty, nothing to deliver\n");
}

#[test]
fn failed_delivery_is_retried_then_escalated() {
    let temp = TempDir::new().unwrap();
    let id = check_in(&temp, "1,1");

    for _ in 0..2 {
        punch_offline(&temp)
            .arg("process")
            .assert()
            .success()
            .stdout(predicate::str::contains("1 will retry"));
    }
    punch_offline(&temp)
        .arg("process")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 failed"));

    let status = status_json(&temp);
    assert_eq!(status["pending"], 0);
    assert_eq!(status["failed"], 1);

    punch(&temp)
        .arg("failed")
        .assert()
        .success()
        .stdout(predicate::str::contains(id))
        .stdout(predicate::str::contains("punch retry"));
}

#[test]
fn sync_keeps_operation_when_delivery_fails() {
    let temp = TempDir::new().unwrap();

    punch_offline(&temp)
        .args(["check-in", "--image", "img-ref", "-l", "1,1", "--sync"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 will retry"));

    assert_eq!(status_json(&temp)["pending"], 1);
}

#[test]
fn retry_unknown_id_fails_with_hint() {
    let temp = TempDir::new().unwrap();

    punch_offline(&temp)
        .args(["retry", "op-missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed operation not found: op-missing"))
        .stderr(predicate::str::contains("punch failed"));
}

#[test]
fn retry_requires_id_or_all() {
    let temp = TempDir::new().unwrap();

    punch_offline(&temp).arg("retry").assert().failure();
    punch_offline(&temp)
        .args(["retry", "op-1", "--all"])
        .assert()
        .failure();
}

#[test]
fn retry_all_moves_failed_back() {
    let temp = TempDir::new().unwrap();
    check_in(&temp, "1,1");
    for _ in 0..3 {
        punch_offline(&temp).arg("process").assert().success();
    }
    assert_eq!(status_json(&temp)["failed"], 1);

    punch_offline(&temp)
        .args(["retry", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Requeued 1 failed operation;"));

    let status = status_json(&temp);
    assert_eq!(status["failed"], 0);
    assert_eq!(status["pending"], 1);
}

// =============================================================================
// Clearing
// =============================================================================

#[test]
fn clear_empties_queue() {
    let temp = TempDir::new().unwrap();
    check_in(&temp, "1,1");
    check_in(&temp, "2,2");

    punch(&temp)
        .arg("clear")
        .assert()
        .success()
        .stdout("Cleared 2 queued operations\n");

    assert_eq!(status_json(&temp)["total"], 0);
}

#[test]
fn clear_failed_leaves_queue_alone() {
    let temp = TempDir::new().unwrap();
    check_in(&temp, "1,1");

    punch(&temp)
        .args(["clear", "--failed"])
        .assert()
        .success()
        .stdout("Cleared 0 failed operations\n");

    assert_eq!(status_json(&temp)["pending"], 1);
}
