// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::seed_task;
use serde_json::json;
use sw_core::FakeClock;
use sw_runtime::ScriptedRuntime;
use sw_store::SqliteStore;

#[test]
fn engine_tick_runs_a_pending_step_to_completion() {
    let store = SqliteStore::open_in_memory(FakeClock::default()).unwrap();
    let task_id = seed_task(&store);
    let step_id = store.create_step(task_id, "pool", &json!({"docker_pool": {}})).unwrap();
    let engine = Engine::new(store, ScriptedRuntime::new(), FakeClock::default());

    engine.tick().unwrap();

    let step = engine.store.get_step(step_id).unwrap().unwrap();
    assert!(step.succeeded());
}
