// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for this crate's own tests.

use serde_json::json;
use sw_core::{FakeClock, TaskId, TaskStatus};
use sw_store::SqliteStore;

pub fn seed_task(store: &SqliteStore<FakeClock>) -> TaskId {
    store.create_task("demo", TaskStatus::Active, Some("/tmp/t"), &json!({})).unwrap()
}

pub fn seed_task_with_status(store: &SqliteStore<FakeClock>, status: TaskStatus) -> TaskId {
    store.create_task("demo", status, Some("/tmp/t"), &json!({})).unwrap()
}

pub fn seed_task_with_settings(store: &SqliteStore<FakeClock>, settings: serde_json::Value) -> TaskId {
    store.create_task("demo", TaskStatus::Active, Some("/tmp/t"), &settings).unwrap()
}
