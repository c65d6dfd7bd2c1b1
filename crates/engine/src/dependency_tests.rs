// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::seed_task;
use serde_json::json;
use sw_core::FakeClock;

fn store() -> SqliteStore<FakeClock> {
    SqliteStore::open_in_memory(FakeClock::default()).unwrap()
}

#[test]
fn ready_is_false_when_dependency_has_no_results() {
    let store = store();
    let task_id = seed_task(&store);
    let dep_id = store.create_step(task_id, "dep", &json!({"file_exists": {"files": []}})).unwrap();
    let step_id = store
        .create_step(task_id, "shell", &json!({"docker_shell": {"docker": {}, "command": [], "depends_on": [{"id": dep_id.get()}]}}))
        .unwrap();
    let step = store.get_step(step_id).unwrap().unwrap();
    assert!(!ready(&step, &store));
}

#[test]
fn ready_is_true_when_every_dependency_succeeded() {
    let store = store();
    let task_id = seed_task(&store);
    let dep_id = store.create_step(task_id, "dep", &json!({"file_exists": {"files": []}})).unwrap();
    store.update_step_results(dep_id, &json!({"result": "success"})).unwrap();
    let step_id = store
        .create_step(task_id, "shell", &json!({"docker_shell": {"docker": {}, "command": [], "depends_on": [{"id": dep_id.get()}]}}))
        .unwrap();
    let step = store.get_step(step_id).unwrap().unwrap();
    assert!(ready(&step, &store));
}

#[test]
fn inherit_image_identity_walks_through_docker_build_ancestor() {
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
    let step = store.get_step(step_id).unwrap().unwrap();
    let (image_id, image_tag) = inherit_image_identity(&step, &store);
    assert_eq!(image_id.as_deref(), Some("sha256:abc"));
    assert_eq!(image_tag.as_deref(), Some("img:1"));
}

#[test]
fn inherit_image_identity_falls_back_to_task_level_identity_for_a_plain_docker_build() {
    let store = store();
    let task_id = store
        .create_task("demo", sw_core::TaskStatus::Active, Some("/tmp/t"), &json!({"docker": {"image_tag": "img:1", "image_id": "sha256:abc"}}))
        .unwrap();
    let build_id = store.create_step(task_id, "build", &json!({"docker_build": {"params": []}})).unwrap();
    let step_id = store
        .create_step(task_id, "shell", &json!({"docker_shell": {"docker": {}, "command": [], "depends_on": [{"id": build_id.get()}]}}))
        .unwrap();
    let step = store.get_step(step_id).unwrap().unwrap();
    let (image_id, image_tag) = inherit_image_identity(&step, &store);
    assert_eq!(image_id.as_deref(), Some("sha256:abc"));
    assert_eq!(image_tag.as_deref(), Some("img:1"));
}

#[test]
fn inherit_image_identity_resolves_a_diamond_shaped_dependency_graph() {
    let store = store();
    let task_id = seed_task(&store);
    let build_id = store
        .create_step(task_id, "build", &json!({"docker_build": {"image_id": "sha256:abc", "image_tag": "img:1", "params": []}}))
        .unwrap();
    let left_id = store
        .create_step(
            task_id,
            "left",
            &json!({"docker_shell": {"docker": {}, "command": [], "depends_on": [{"id": build_id.get()}]}}),
        )
        .unwrap();
    let right_id = store
        .create_step(
            task_id,
            "right",
            &json!({"docker_shell": {"docker": {}, "command": [], "depends_on": [{"id": build_id.get()}]}}),
        )
        .unwrap();
    let step_id = store
        .create_step(
            task_id,
            "join",
            &json!({"docker_shell": {"docker": {}, "command": [], "depends_on": [{"id": left_id.get()}, {"id": right_id.get()}]}}),
        )
        .unwrap();
    let step = store.get_step(step_id).unwrap().unwrap();
    let (image_id, image_tag) = inherit_image_identity(&step, &store);
    assert_eq!(image_id.as_deref(), Some("sha256:abc"));
    assert_eq!(image_tag.as_deref(), Some("img:1"));
}

#[test]
fn inherit_image_identity_returns_empty_pair_when_nothing_found() {
    let store = store();
    let task_id = seed_task(&store);
    let step_id = store.create_step(task_id, "shell", &json!({"docker_shell": {"docker": {}, "command": []}})).unwrap();
    let step = store.get_step(step_id).unwrap().unwrap();
    assert_eq!(inherit_image_identity(&step, &store), (None, None));
}

#[test]
fn inherit_image_identity_terminates_on_a_cycle() {
    let store = store();
    let task_id = seed_task(&store);
    let a_id = store
        .create_step(task_id, "a", &json!({"docker_shell": {"docker": {}, "command": [], "depends_on": []}}))
        .unwrap();
    let b_id = store
        .create_step(
            task_id,
            "b",
            &json!({"docker_shell": {"docker": {}, "command": [], "depends_on": [{"id": a_id.get()}]}}),
        )
        .unwrap();
    store
        .update_step(a_id, "a", &json!({"docker_shell": {"docker": {}, "command": [], "depends_on": [{"id": b_id.get()}]}}))
        .unwrap();
    let a = store.get_step(a_id).unwrap().unwrap();
    assert_eq!(inherit_image_identity(&a, &store), (None, None));
}
