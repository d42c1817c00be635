// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use crate::commands::testing::{plain, shared, FakeExecutor, TestContext};
use crate::lock::DrainLock;
use punch_core::ItemStatus;

fn args(sync: bool, output: OutputFormat) -> RecordArgs {
    RecordArgs {
        image: "img-ref".to_string(),
        location: "32.08,34.78".to_string(),
        sync,
        output,
    }
}

#[tokio::test]
async fn test_check_in_is_queued_without_delivery() {
    let t = TestContext::new();
    let mut out = Vec::new();

    run(&t.ctx, OperationType::CheckIn, &args(false, OutputFormat::Text), None, &mut out)
        .await
        .unwrap();

    let pending = t.pending().await;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].operation_type, OperationType::CheckIn);
    assert_eq!(pending[0].payload.location, "32.08,34.78");
    assert_eq!(pending[0].status, ItemStatus::Pending);
    assert_eq!(plain(&out), format!("Queued check-in {}\n", pending[0].id));
}

#[tokio::test]
async fn test_check_out_records_its_type() {
    let t = TestContext::new();
    let mut out = Vec::new();

    run(&t.ctx, OperationType::CheckOut, &args(false, OutputFormat::Text), None, &mut out)
        .await
        .unwrap();

    assert_eq!(t.pending().await[0].operation_type, OperationType::CheckOut);
    assert!(plain(&out).starts_with("Queued check-out "));
}

#[tokio::test]
async fn test_sync_delivers_immediately() {
    let t = TestContext::new();
    let executor = FakeExecutor::succeeding();
    let mut out = Vec::new();

    run(
        &t.ctx,
        OperationType::CheckIn,
        &args(true, OutputFormat::Text),
        Some(shared(&executor)),
        &mut out,
    )
    .await
    .unwrap();

    assert_eq!(executor.calls(), 1);
    assert!(t.pending().await.is_empty());
    assert!(plain(&out).contains("1 delivered"));
}

#[tokio::test]
async fn test_sync_failure_keeps_item_queued() {
    let t = TestContext::new();
    let executor = FakeExecutor::failing();
    let mut out = Vec::new();

    run(
        &t.ctx,
        OperationType::CheckIn,
        &args(true, OutputFormat::Text),
        Some(shared(&executor)),
        &mut out,
    )
    .await
    .unwrap();

    let pending = t.pending().await;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].retry_count, 1);
    assert!(plain(&out).contains("1 will retry"));
}

#[tokio::test]
async fn test_sync_with_busy_lock_still_queues() {
    let t = TestContext::new();
    let _held = DrainLock::acquire(&t.ctx.state_dir).unwrap();
    let executor = FakeExecutor::succeeding();
    let mut out = Vec::new();

    run(
        &t.ctx,
        OperationType::CheckIn,
        &args(true, OutputFormat::Text),
        Some(shared(&executor)),
        &mut out,
    )
    .await
    .unwrap();

    assert_eq!(executor.calls(), 0);
    assert_eq!(t.pending().await.len(), 1);
}

#[tokio::test]
async fn test_json_output() {
    let t = TestContext::new();
    let mut out = Vec::new();

    run(&t.ctx, OperationType::CheckIn, &args(false, OutputFormat::Json), None, &mut out)
        .await
        .unwrap();

    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value["operation_type"], "check-in");
    assert_eq!(value["id"], t.pending().await[0].id.as_str());
    assert!(value.get("report").is_none());
}

#[tokio::test]
async fn test_json_output_with_sync_includes_report() {
    let t = TestContext::new();
    let executor = FakeExecutor::succeeding();
    let mut out = Vec::new();

    run(
        &t.ctx,
        OperationType::CheckIn,
        &args(true, OutputFormat::Json),
        Some(shared(&executor)),
        &mut out,
    )
    .await
    .unwrap();

    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value["report"]["succeeded"], 1);
    assert_eq!(value["report"]["visited"], 1);
}
