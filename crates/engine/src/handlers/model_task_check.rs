// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `model_task_check` (§4.6): template expansion. Substitutes
//! `{YOUR_TASK_PROMPT}`, `{YOUR_RUBRIC}`, and `{held_out_test_patch}` in a
//! sample file with the contents of three declared files, writing the
//! result to a declared output path.

use super::{finish_failure, finish_success, HandlerCtx};
use crate::error::EngineError;
use crate::trigger::{should_run, TriggerInput};
use serde_json::Value;
use sw_core::{read_triggers, write_triggers, Clock, Step, StepResult};
use sw_runtime::ContainerRuntime;
use sw_rubric::render;

pub fn handle<R: ContainerRuntime, C: Clock>(ctx: &HandlerCtx<'_, R, C>, step: &Step) -> Result<(), EngineError> {
    let Ok((_, config)) = step.discriminate() else {
        return finish_failure(ctx, step.id, "step settings missing model_task_check discriminator");
    };
    let Some(task) = ctx.store.read_task(step.task_id)? else {
        return finish_failure(ctx, step.id, format!("owning task {} not found", step.task_id));
    };

    let Some(sample) = config.get("model_prompt_sample").and_then(Value::as_str) else {
        return finish_failure(ctx, step.id, "model_task_check missing model_prompt_sample");
    };
    let Some(task_prompt) = config.get("task_prompt").and_then(Value::as_str) else {
        return finish_failure(ctx, step.id, "model_task_check missing task_prompt");
    };
    let Some(rubric) = config.get("rubrics_json").and_then(Value::as_str) else {
        return finish_failure(ctx, step.id, "model_task_check missing rubrics_json");
    };
    let Some(held_out) = config.get("held_out_tests").and_then(Value::as_str) else {
        return finish_failure(ctx, step.id, "model_task_check missing held_out_tests");
    };
    let Some(generated) = config.get("generated_file").and_then(Value::as_str) else {
        return finish_failure(ctx, step.id, "model_task_check missing generated_file");
    };

    let triggers = read_triggers(config);
    let force = config.get("force").and_then(Value::as_bool).unwrap_or(false);
    let generated_path = task.resolve(generated);
    let trigger_input = TriggerInput {
        triggers: &triggers,
        base_path: task.local_path.as_deref(),
        force,
        generated_file: generated_path.as_deref(),
        image_identity: None,
    };
    if !should_run(&trigger_input, ctx.runtime) {
        return finish_success(ctx, step.id, StepResult::success());
    }

    if let Err(message) = expand(&task, sample, task_prompt, rubric, held_out, generated) {
        return finish_failure(ctx, step.id, message);
    }

    let mut refreshed = triggers.clone();
    for relative in [sample, task_prompt, rubric, held_out] {
        if let Some(hash) = task.resolve(relative).and_then(|path| sw_hash::hash_file(&path).ok()) {
            refreshed.insert(relative.to_string(), hash);
        }
    }
    let new_config = write_triggers(config, &refreshed);
    ctx.store.update_step_settings(step.id, &serde_json::json!({"model_task_check": new_config}))?;
    finish_success(ctx, step.id, StepResult::success())
}

fn expand(
    task: &sw_core::Task,
    sample: &str,
    task_prompt: &str,
    rubric: &str,
    held_out: &str,
    generated: &str,
) -> Result<(), String> {
    let read = |relative: &str| -> Result<String, String> {
        let path = task.resolve(relative).ok_or_else(|| "owning task has no local_path".to_string())?;
        std::fs::read_to_string(&path).map_err(|err| format!("reading {relative}: {err}"))
    };
    let sample_text = read(sample)?;
    let task_prompt_text = read(task_prompt)?;
    let rubric_text = read(rubric)?;
    let held_out_text = read(held_out)?;
    let rendered = render(&sample_text, &task_prompt_text, &rubric_text, &held_out_text);
    let output_path = task.resolve(generated).ok_or_else(|| "owning task has no local_path".to_string())?;
    std::fs::write(&output_path, rendered).map_err(|err| format!("writing {generated}: {err}"))
}

#[cfg(test)]
#[path = "model_task_check_tests.rs"]
mod tests;
