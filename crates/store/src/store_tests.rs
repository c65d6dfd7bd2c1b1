// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;
use sw_core::FakeClock;

fn store() -> SqliteStore<FakeClock> {
    SqliteStore::open_in_memory(FakeClock::default()).unwrap()
}

fn seed_task(store: &SqliteStore<FakeClock>, status: &str) -> TaskId {
    let conn = store.conn.lock().unwrap();
    conn.execute(
        "INSERT INTO tasks (name, status, local_path, settings, created_at, updated_at) \
         VALUES ('demo', ?1, '/tmp/t', '{}', '2026-01-01T00:00:00Z', '2026-01-01T00:00:00Z')",
        params![status],
    )
    .unwrap();
    TaskId::new(conn.last_insert_rowid())
}

#[test]
fn create_then_read_step_round_trips_settings() {
    let store = store();
    let task_id = seed_task(&store, "active");
    let step_id = store.create_step(task_id, "build", &json!({"docker_build": {"params": []}})).unwrap();
    let steps = store.select_pending(StepKind::DockerBuild, Some(step_id)).unwrap();
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].title, "build");
}

#[test]
fn select_pending_filters_by_discriminator_and_task_status() {
    let store = store();
    let active = seed_task(&store, "active");
    let disabled = seed_task(&store, "disabled");
    store.create_step(active, "build", &json!({"docker_build": {"params": []}})).unwrap();
    store.create_step(active, "pull", &json!({"docker_pull": {"image_tag": "img:1"}})).unwrap();
    store.create_step(disabled, "build-disabled", &json!({"docker_build": {"params": []}})).unwrap();

    let pending = store.select_pending(StepKind::DockerBuild, None).unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].title, "build");
}

#[test]
fn write_task_settings_then_read_back() {
    let store = store();
    let task_id = seed_task(&store, "active");
    store.write_task_settings(task_id, &json!({"docker": {"image_id": "sha256:abc"}})).unwrap();
    let settings = store.read_task_settings(task_id).unwrap();
    assert_eq!(settings["docker"]["image_id"], "sha256:abc");
}

#[test]
fn update_step_results_persists_document() {
    let store = store();
    let task_id = seed_task(&store, "active");
    let step_id = store.create_step(task_id, "build", &json!({"docker_build": {"params": []}})).unwrap();
    store.update_step_results(step_id, &json!({"result": "success"})).unwrap();
    let steps = store.select_pending(StepKind::DockerBuild, Some(step_id)).unwrap();
    assert_eq!(steps[0].results, Some(json!({"result": "success"})));
}

#[test]
fn delete_step_removes_row() {
    let store = store();
    let task_id = seed_task(&store, "active");
    let step_id = store.create_step(task_id, "build", &json!({"docker_build": {"params": []}})).unwrap();
    store.delete_step(step_id).unwrap();
    assert!(store.select_pending(StepKind::DockerBuild, Some(step_id)).unwrap().is_empty());
}

#[test]
fn delete_step_missing_row_is_an_error() {
    let store = store();
    assert!(matches!(store.delete_step(StepId::new(999)), Err(StoreError::StepNotFound(_))));
}

#[test]
fn get_generated_steps_filters_by_producer() {
    let store = store();
    let task_id = seed_task(&store, "active");
    let producer = store.create_step(task_id, "rubric", &json!({"dynamic_rubric": {"file": "r.md", "hash": "", "environment": {"docker": true}}})).unwrap();
    store
        .create_step(
            task_id,
            "criterion-1",
            &json!({"rubric_shell": {"command": "true", "criterion_id": "1", "counter": 1, "score": 0, "required": true, "depends_on": [], "generated_by": producer.get()}}),
        )
        .unwrap();
    store.create_step(task_id, "other", &json!({"file_exists": {"files": []}})).unwrap();

    let generated = store.get_generated_steps(producer).unwrap();
    assert_eq!(generated.len(), 1);
    assert_eq!(generated[0].title, "criterion-1");
}

#[test]
fn get_step_ignores_discriminator() {
    let store = store();
    let task_id = seed_task(&store, "active");
    let step_id = store.create_step(task_id, "pull", &json!({"docker_pull": {"image_tag": "img:1"}})).unwrap();
    let step = store.get_step(step_id).unwrap().unwrap();
    assert_eq!(step.title, "pull");
}

#[test]
fn copy_step_fails_when_destination_task_missing() {
    let store = store();
    let task_id = seed_task(&store, "active");
    let step_id = store.create_step(task_id, "build", &json!({"docker_build": {"params": []}})).unwrap();
    let err = store.copy_step(step_id, TaskId::new(9999)).unwrap_err();
    assert!(matches!(err, StoreError::TaskNotFound(_)));
}

#[test]
fn copy_step_duplicates_title_and_settings_into_destination_task() {
    let store = store();
    let task_a = seed_task(&store, "active");
    let task_b = seed_task(&store, "active");
    let step_id = store.create_step(task_a, "build", &json!({"docker_build": {"params": ["-t"]}})).unwrap();
    let new_id = store.copy_step(step_id, task_b).unwrap();
    let copied = store.select_pending(StepKind::DockerBuild, Some(new_id)).unwrap();
    assert_eq!(copied[0].task_id, task_b);
    assert_eq!(copied[0].title, "build");
}

#[test]
fn edit_step_field_persists_dotted_path_write() {
    let store = store();
    let task_id = seed_task(&store, "active");
    let step_id = store.create_step(task_id, "pull", &json!({"docker_pull": {"image_tag": "img:1"}})).unwrap();
    store.edit_step_field(step_id, "docker_pull.image_id", json!("sha256:abc")).unwrap();
    let steps = store.select_pending(StepKind::DockerPull, Some(step_id)).unwrap();
    assert_eq!(steps[0].settings["docker_pull"]["image_id"], "sha256:abc");
    assert_eq!(steps[0].settings["docker_pull"]["image_tag"], "img:1");
}

#[test]
fn edit_step_field_missing_step_is_an_error() {
    let store = store();
    let err = store.edit_step_field(StepId::new(999), "a.b", json!(1)).unwrap_err();
    assert!(matches!(err, StoreError::StepNotFound(_)));
}
