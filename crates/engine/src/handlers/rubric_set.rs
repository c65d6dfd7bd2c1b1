// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rubric_set` (§4.6): a pre-authored rubric declared inline rather than
//! discovered through a container dependency. Hash-gates on its rubric
//! file plus whichever solution files it declares, then materialises
//! `rubric_shell` steps keyed by `criterion.title` rather than
//! `criterion_id` — the spec calls this id stable across edits because a
//! hand-authored rubric's titles rarely change, unlike a generated one's
//! ordinal counters.

use super::{finish_failure, finish_success, HandlerCtx};
use crate::error::EngineError;
use crate::materialize::materialize;
use serde_json::{json, Value};
use sw_core::{Clock, Criterion, Step, StepResult, Task};
use sw_runtime::ContainerRuntime;
use sw_rubric::parse_rubric;

/// Declared fields, other than `hashes`, that `rubric_set` hash-gates on.
const TRACKED_FIELDS: &[&str] = &["file", "held_out_test", "solution_1", "solution_2", "solution_3", "solution_4"];

pub fn handle<R: ContainerRuntime, C: Clock>(ctx: &HandlerCtx<'_, R, C>, step: &Step) -> Result<(), EngineError> {
    let Ok((_, config)) = step.discriminate() else {
        return finish_failure(ctx, step.id, "step settings missing rubric_set discriminator");
    };
    let Some(task) = ctx.store.read_task(step.task_id)? else {
        return finish_failure(ctx, step.id, format!("owning task {} not found", step.task_id));
    };
    let Some(file) = config.get("file").and_then(Value::as_str) else {
        return finish_failure(ctx, step.id, "rubric_set missing file");
    };

    let force = config.get("force").and_then(Value::as_bool).unwrap_or(false);
    let hashes = config.get("hashes").and_then(Value::as_object).cloned().unwrap_or_default();
    let tracked = declared_files(config);
    let unchanged = !force && !tracked.is_empty() && tracked.iter().all(|(key, relative)| {
        let recorded = hashes.get(key.as_str()).and_then(Value::as_str);
        let current = task.resolve(relative).and_then(|path| sw_hash::hash_file(&path).ok());
        recorded.is_some() && current.as_deref() == recorded
    });
    if unchanged {
        return finish_success(ctx, step.id, StepResult::success());
    }

    let Some(dependency_id) = locate_container_dependency_via_settings(ctx, step.task_id)? else {
        return finish_failure(ctx, step.id, "no container-providing step found for this task");
    };
    if let Err(message) = expand(ctx, step, &task, file, dependency_id) {
        return finish_failure(ctx, step.id, message);
    }

    let mut new_hashes = serde_json::Map::new();
    for (key, relative) in &tracked {
        if let Some(hash) = task.resolve(relative).and_then(|path| sw_hash::hash_file(&path).ok()) {
            new_hashes.insert(key.clone(), json!(hash));
        }
    }
    let mut new_config = config.clone();
    new_config["hashes"] = Value::Object(new_hashes);
    ctx.store.update_step_settings(step.id, &json!({"rubric_set": new_config}))?;
    finish_success(ctx, step.id, StepResult::success())
}

fn declared_files(config: &Value) -> Vec<(String, String)> {
    TRACKED_FIELDS
        .iter()
        .filter_map(|field| config.get(*field).and_then(Value::as_str).map(|path| (field.to_string(), path.to_string())))
        .collect()
}

fn expand<R: ContainerRuntime, C: Clock>(
    ctx: &HandlerCtx<'_, R, C>,
    step: &Step,
    task: &Task,
    file: &str,
    dependency_id: sw_core::StepId,
) -> Result<(), String> {
    let rubric_path = task.resolve(file).ok_or_else(|| "owning task has no local_path".to_string())?;
    let markdown = std::fs::read_to_string(&rubric_path).map_err(|err| format!("reading rubric file: {err}"))?;
    let criteria = parse_rubric(&markdown).map_err(|err| err.to_string())?;
    let keyed: Vec<(String, Criterion)> = criteria.into_iter().map(|c| (c.title.clone(), c)).collect();
    materialize(ctx, task.id, step.id, dependency_id, &keyed).map_err(|err| err.to_string())
}

/// `rubric_set` has no `depends_on` list of its own (§6.3); it locates the
/// one container-providing step already materialised for its task by any
/// step whose results carry a `container_id`.
fn locate_container_dependency_via_settings<R: ContainerRuntime, C: Clock>(
    ctx: &HandlerCtx<'_, R, C>,
    task_id: sw_core::TaskId,
) -> Result<Option<sw_core::StepId>, EngineError> {
    Ok(ctx
        .store
        .steps_for_task(task_id)?
        .into_iter()
        .find(|candidate| candidate.results.as_ref().and_then(|r| r.get("container_id")).and_then(Value::as_str).is_some())
        .map(|candidate| candidate.id))
}

#[cfg(test)]
#[path = "rubric_set_tests.rs"]
mod tests;
