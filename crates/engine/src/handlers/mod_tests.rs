// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::seed_task;
use serde_json::json;
use sw_core::FakeClock;
use sw_runtime::ScriptedRuntime;
use sw_store::SqliteStore;

fn store() -> SqliteStore<FakeClock> {
    SqliteStore::open_in_memory(FakeClock::default()).unwrap()
}

#[yare::parameterized(
    docker_pool = { StepKind::DockerPool, json!({"docker_pool": {}}) },
    file_exists = { StepKind::FileExists, json!({"file_exists": {"files": []}}) },
    rubric_set  = { StepKind::RubricSet, json!({"rubric_set": {"file": "r.md", "hashes": {}}}) },
)]
fn dispatch_routes_each_kind_to_its_own_handler_without_panicking(kind: StepKind, settings: serde_json::Value) {
    let store = store();
    let task_id = seed_task(&store);
    let step_id = store.create_step(task_id, "step", &settings).unwrap();
    let runtime = ScriptedRuntime::new();
    let clock = FakeClock::default();
    let ctx = HandlerCtx { store: &store, runtime: &runtime, clock: &clock };
    let step = store.get_step(step_id).unwrap().unwrap();

    dispatch(&ctx, kind, &step).unwrap();

    assert!(store.get_step(step_id).unwrap().unwrap().results.is_some());
}

#[test]
fn dispatch_trusts_the_caller_s_kind_and_still_fails_on_a_mismatched_step() {
    // `select_pending` guarantees the discriminator matches `kind` before
    // `dispatch` ever sees a step; calling it directly with a mismatch
    // still fails safely because the handler validates its own required
    // fields rather than trusting `kind`.
    let store = store();
    let task_id = seed_task(&store);
    let step_id = store.create_step(task_id, "step", &json!({"file_exists": {"files": []}})).unwrap();
    let runtime = ScriptedRuntime::new();
    let clock = FakeClock::default();
    let ctx = HandlerCtx { store: &store, runtime: &runtime, clock: &clock };
    let step = store.get_step(step_id).unwrap().unwrap();

    dispatch(&ctx, StepKind::RubricSet, &step).unwrap();

    let step = store.get_step(step_id).unwrap().unwrap();
    assert!(!step.succeeded());
}
