// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::handlers::HandlerCtx;
use crate::test_support::seed_task;
use serde_json::json;
use sw_core::FakeClock;
use sw_runtime::{CommandOutcome, ScriptedRuntime};
use sw_store::SqliteStore;

fn store() -> SqliteStore<FakeClock> {
    SqliteStore::open_in_memory(FakeClock::default()).unwrap()
}

#[test]
fn runs_every_command_and_aggregates_success() {
    let store = store();
    let task_id = seed_task(&store);
    let step_id = store
        .create_step(
            task_id,
            "shell",
            &json!({"docker_shell": {"docker": {"image_tag": "img:1", "image_id": "sha256:abc"}, "command": [{"build": "echo hi"}, {"test": "pytest"}]}}),
        )
        .unwrap();
    let runtime = ScriptedRuntime::new()
        .with_containers("img:1", vec!["c1".to_string()])
        .with_container_image("c1", "sha256:abc")
        .with_exec("c1", "echo hi", CommandOutcome { success: true, stdout: "hi".to_string(), stderr: String::new() })
        .with_exec("c1", "pytest", CommandOutcome { success: true, stdout: "ok".to_string(), stderr: String::new() });
    let clock = FakeClock::default();
    let ctx = HandlerCtx { store: &store, runtime: &runtime, clock: &clock };
    let step = store.get_step(step_id).unwrap().unwrap();

    handle(&ctx, &step).unwrap();

    let step = store.get_step(step_id).unwrap().unwrap();
    assert!(step.succeeded());
    assert_eq!(step.results.unwrap()["outputs"].as_array().unwrap().len(), 2);
}

#[test]
fn one_failing_command_demotes_aggregate_result_to_failure() {
    let store = store();
    let task_id = seed_task(&store);
    let step_id = store
        .create_step(
            task_id,
            "shell",
            &json!({"docker_shell": {"docker": {"image_tag": "img:1", "image_id": "sha256:abc"}, "command": [{"test": "pytest"}]}}),
        )
        .unwrap();
    let runtime = ScriptedRuntime::new()
        .with_containers("img:1", vec!["c1".to_string()])
        .with_container_image("c1", "sha256:abc")
        .with_exec("c1", "pytest", CommandOutcome { success: false, stdout: String::new(), stderr: "boom".to_string() });
    let clock = FakeClock::default();
    let ctx = HandlerCtx { store: &store, runtime: &runtime, clock: &clock };
    let step = store.get_step(step_id).unwrap().unwrap();

    handle(&ctx, &step).unwrap();

    let step = store.get_step(step_id).unwrap().unwrap();
    assert!(!step.succeeded());
}

#[test]
fn digest_mismatch_fails_without_running_commands() {
    let store = store();
    let task_id = seed_task(&store);
    let step_id = store
        .create_step(
            task_id,
            "shell",
            &json!({"docker_shell": {"docker": {"image_tag": "img:1", "image_id": "sha256:abc"}, "command": [{"test": "pytest"}]}}),
        )
        .unwrap();
    let runtime = ScriptedRuntime::new().with_containers("img:1", vec!["c1".to_string()]).with_container_image("c1", "sha256:different");
    let clock = FakeClock::default();
    let ctx = HandlerCtx { store: &store, runtime: &runtime, clock: &clock };
    let step = store.get_step(step_id).unwrap().unwrap();

    handle(&ctx, &step).unwrap();

    assert!(runtime.calls().iter().all(|c| !matches!(c, sw_runtime::ScriptedCall::Exec { .. })));
    let step = store.get_step(step_id).unwrap().unwrap();
    assert!(!step.succeeded());
}

#[test]
fn inherits_identity_through_depends_on_when_own_config_is_empty() {
    let store = store();
    let task_id = seed_task(&store);
    let build_id = store
        .create_step(task_id, "build", &json!({"docker_build": {"image_id": "sha256:abc", "image_tag": "img:1", "params": []}}))
        .unwrap();
    let step_id = store
        .create_step(
            task_id,
            "shell",
            &json!({"docker_shell": {"docker": {}, "command": [], "depends_on": [{"id": build_id.get()}]}}),
        )
        .unwrap();
    let runtime = ScriptedRuntime::new().with_containers("img:1", vec!["c1".to_string()]).with_container_image("c1", "sha256:abc");
    let clock = FakeClock::default();
    let ctx = HandlerCtx { store: &store, runtime: &runtime, clock: &clock };
    let step = store.get_step(step_id).unwrap().unwrap();

    handle(&ctx, &step).unwrap();

    let step = store.get_step(step_id).unwrap().unwrap();
    assert!(step.succeeded());
}
