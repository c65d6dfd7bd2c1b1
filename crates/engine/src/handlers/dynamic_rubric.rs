// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dynamic_lab` and `dynamic_rubric` (§4.6): hash-gated rubric
//! expansion. Both locate an upstream container-providing dependency and
//! invoke the materialiser (§4.8); they differ only in their trigger
//! shape (`files: {path: hash}` vs a single `file`/`hash` pair).

use super::{finish_failure, finish_success, HandlerCtx};
use crate::error::EngineError;
use crate::materialize::materialize;
use crate::trigger::{should_run, TriggerInput};
use serde_json::{json, Map, Value};
use sw_core::{read_triggers, Clock, Criterion, Step, StepId, StepResult, Task, TriggerSet};
use sw_runtime::ContainerRuntime;
use sw_rubric::parse_rubric;
use sw_store::SqliteStore;

pub fn handle_dynamic_lab<R: ContainerRuntime, C: Clock>(ctx: &HandlerCtx<'_, R, C>, step: &Step) -> Result<(), EngineError> {
    let Ok((_, config)) = step.discriminate() else {
        return finish_failure(ctx, step.id, "step settings missing dynamic_lab discriminator");
    };
    let Some(task) = ctx.store.read_task(step.task_id)? else {
        return finish_failure(ctx, step.id, format!("owning task {} not found", step.task_id));
    };

    let mut triggers = read_triggers(config);
    let force = config.get("force").and_then(Value::as_bool).unwrap_or(false);
    let trigger_input = TriggerInput { triggers: &triggers, base_path: task.local_path.as_deref(), force, generated_file: None, image_identity: None };
    if !should_run(&trigger_input, ctx.runtime) {
        return finish_success(ctx, step.id, StepResult::success());
    }

    let rubric_relative = config.get("rubric_file").and_then(Value::as_str).unwrap_or_default();
    if let Err(message) = expand_rubric(ctx, step, &task, config, rubric_relative) {
        return finish_failure(ctx, step.id, message);
    }

    if let Some(base) = &task.local_path {
        for (path, hash) in triggers.iter_mut() {
            if let Ok(fresh) = sw_hash::hash_file(&base.join(path.as_str())) {
                *hash = fresh;
            }
        }
    }
    let new_config = write_files_map(config, &triggers);
    ctx.store.update_step_settings(step.id, &json!({"dynamic_lab": new_config}))?;
    finish_success(ctx, step.id, StepResult::success())
}

pub fn handle_dynamic_rubric<R: ContainerRuntime, C: Clock>(ctx: &HandlerCtx<'_, R, C>, step: &Step) -> Result<(), EngineError> {
    let Ok((_, config)) = step.discriminate() else {
        return finish_failure(ctx, step.id, "step settings missing dynamic_rubric discriminator");
    };
    let Some(task) = ctx.store.read_task(step.task_id)? else {
        return finish_failure(ctx, step.id, format!("owning task {} not found", step.task_id));
    };

    let file = config.get("file").and_then(Value::as_str).unwrap_or_default();
    if file.is_empty() {
        return finish_failure(ctx, step.id, "dynamic_rubric missing file");
    }
    let mut triggers = TriggerSet::new();
    if let Some(hash) = config.get("hash").and_then(Value::as_str) {
        triggers.insert(file.to_string(), hash.to_string());
    }
    let force = config.get("force").and_then(Value::as_bool).unwrap_or(false);
    let trigger_input = TriggerInput { triggers: &triggers, base_path: task.local_path.as_deref(), force, generated_file: None, image_identity: None };
    if !should_run(&trigger_input, ctx.runtime) {
        return finish_success(ctx, step.id, StepResult::success());
    }

    if let Err(message) = expand_rubric(ctx, step, &task, config, file) {
        return finish_failure(ctx, step.id, message);
    }

    let new_hash = task.local_path.as_ref().and_then(|base| sw_hash::hash_file(&base.join(file)).ok()).unwrap_or_default();
    let mut new_config = config.clone();
    new_config["hash"] = json!(new_hash);
    ctx.store.update_step_settings(step.id, &json!({"dynamic_rubric": new_config}))?;
    finish_success(ctx, step.id, StepResult::success())
}

/// The first dependency whose recorded results carry a `container_id`
/// also supplies the id generated steps will depend on (§4.6).
fn locate_container_dependency<C: Clock>(store: &SqliteStore<C>, config: &Value) -> Option<StepId> {
    Step::depends_on(config)
        .into_iter()
        .find(|dep_id| matches!(store.get_step(*dep_id), Ok(Some(dep)) if dep.results.as_ref().and_then(|r| r.get("container_id")).and_then(Value::as_str).is_some()))
}

fn expand_rubric<R: ContainerRuntime, C: Clock>(
    ctx: &HandlerCtx<'_, R, C>,
    step: &Step,
    task: &Task,
    config: &Value,
    rubric_relative: &str,
) -> Result<(), String> {
    let rubric_path = task.resolve(rubric_relative).ok_or_else(|| "owning task has no local_path".to_string())?;
    let markdown = std::fs::read_to_string(&rubric_path).map_err(|err| format!("reading rubric file: {err}"))?;
    let criteria = parse_rubric(&markdown).map_err(|err| err.to_string())?;
    let dependency_id =
        locate_container_dependency(ctx.store, config).ok_or_else(|| "no upstream container-providing dependency found".to_string())?;
    let keyed: Vec<(String, Criterion)> = criteria.into_iter().map(|c| (c.criterion_id(), c)).collect();
    materialize(ctx, task.id, step.id, dependency_id, &keyed).map_err(|err| err.to_string())
}

/// Writes back the `files: {path: hash}` shape in place, without the
/// `triggers.files` nesting `write_triggers` uses elsewhere — `dynamic_lab`
/// declares `files` as its own top-level field, not a historical alias.
fn write_files_map(config: &Value, triggers: &TriggerSet) -> Value {
    let mut config = config.as_object().cloned().unwrap_or_default();
    let files: Map<String, Value> = triggers.iter().map(|(path, hash)| (path.clone(), Value::String(hash.clone()))).collect();
    config.insert("files".to_string(), Value::Object(files));
    Value::Object(config)
}

#[cfg(test)]
#[path = "dynamic_rubric_tests.rs"]
mod tests;
