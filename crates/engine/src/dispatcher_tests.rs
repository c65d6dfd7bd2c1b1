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
fn one_tick_dispatches_every_pending_step_across_kinds() {
    let store = store();
    let task_id = seed_task(&store);
    let pool_id = store.create_step(task_id, "pool", &json!({"docker_pool": {}})).unwrap();
    let file_id = store.create_step(task_id, "presence", &json!({"file_exists": {"files": []}})).unwrap();
    let runtime = ScriptedRuntime::new();
    let clock = FakeClock::default();
    let ctx = HandlerCtx { store: &store, runtime: &runtime, clock: &clock };

    tick(&ctx).unwrap();

    assert!(store.get_step(pool_id).unwrap().unwrap().succeeded());
    assert!(store.get_step(file_id).unwrap().unwrap().succeeded());
}

#[test]
fn one_failing_step_does_not_stop_the_rest_of_the_tick() {
    let store = store();
    let task_id = seed_task(&store);
    let failing_id = store.create_step(task_id, "presence", &json!({"file_exists": {"files": ["missing.txt"]}})).unwrap();
    let passing_id = store.create_step(task_id, "pool", &json!({"docker_pool": {}})).unwrap();
    let runtime = ScriptedRuntime::new();
    let clock = FakeClock::default();
    let ctx = HandlerCtx { store: &store, runtime: &runtime, clock: &clock };

    tick(&ctx).unwrap();

    assert!(!store.get_step(failing_id).unwrap().unwrap().succeeded());
    assert!(store.get_step(passing_id).unwrap().unwrap().succeeded());
}

#[test]
fn dispatch_order_runs_docker_build_before_steps_that_depend_on_its_image() {
    let store = store();
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Dockerfile"), "FROM busybox").unwrap();
    let task_id = store
        .create_task("demo", sw_core::TaskStatus::Active, Some(dir.path().to_str().unwrap()), &json!({"docker": {"image_tag": "img:1"}}))
        .unwrap();
    let build_id = store
        .create_step(task_id, "build", &json!({"docker_build": {"params": [], "triggers": {"files": {}}}}))
        .unwrap();
    let run_id = store
        .create_step(task_id, "run", &json!({"docker_run": {"docker": {}, "depends_on": [{"id": build_id.get()}]}}))
        .unwrap();
    let runtime = ScriptedRuntime::new().with_image_id("img:1", "sha256:abc123").with_containers("sha256:abc123", vec!["c1".to_string()]);
    let clock = FakeClock::default();
    let ctx = HandlerCtx { store: &store, runtime: &runtime, clock: &clock };

    tick(&ctx).unwrap();

    assert!(store.get_step(build_id).unwrap().unwrap().succeeded());
    assert!(store.get_step(run_id).unwrap().unwrap().succeeded());
}
