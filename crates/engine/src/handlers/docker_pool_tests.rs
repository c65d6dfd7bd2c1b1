// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::handlers::HandlerCtx;
use crate::test_support::seed_task;
use serde_json::json;
use sw_core::FakeClock;
use sw_runtime::ScriptedRuntime;
use sw_store::SqliteStore;

fn store() -> SqliteStore<FakeClock> {
    SqliteStore::open_in_memory(FakeClock::default()).unwrap()
}

#[test]
fn succeeds_once_every_dependency_is_ready() {
    let store = store();
    let task_id = seed_task(&store);
    let dep_id = store.create_step(task_id, "dep", &json!({"file_exists": {"files": []}})).unwrap();
    store.update_step_results(dep_id, &json!({"result": "success"})).unwrap();
    let step_id = store.create_step(task_id, "pool", &json!({"docker_pool": {"depends_on": [{"id": dep_id.get()}]}})).unwrap();
    let runtime = ScriptedRuntime::new();
    let clock = FakeClock::default();
    let ctx = HandlerCtx { store: &store, runtime: &runtime, clock: &clock };
    let step = store.get_step(step_id).unwrap().unwrap();

    handle(&ctx, &step).unwrap();

    assert!(store.get_step(step_id).unwrap().unwrap().succeeded());
}

#[test]
fn leaves_result_untouched_while_waiting() {
    let store = store();
    let task_id = seed_task(&store);
    let dep_id = store.create_step(task_id, "dep", &json!({"file_exists": {"files": []}})).unwrap();
    let step_id = store.create_step(task_id, "pool", &json!({"docker_pool": {"depends_on": [{"id": dep_id.get()}]}})).unwrap();
    let runtime = ScriptedRuntime::new();
    let clock = FakeClock::default();
    let ctx = HandlerCtx { store: &store, runtime: &runtime, clock: &clock };
    let step = store.get_step(step_id).unwrap().unwrap();

    handle(&ctx, &step).unwrap();

    assert!(store.get_step(step_id).unwrap().unwrap().results.is_none());
}
