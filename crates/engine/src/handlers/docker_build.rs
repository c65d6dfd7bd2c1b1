// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `docker_build` (§4.6): task-authoritative image identity, replacing any
//! recorded `--platform` token in `params` with the task's own `platform`,
//! and the `Dockefile` typo fix.

use super::{finish_failure, finish_success, HandlerCtx};
use crate::error::EngineError;
use crate::trigger::{should_run, ImageIdentityExpectation, TriggerInput};
use serde_json::{json, Value};
use sw_core::{fix_dockefile_typo, read_triggers, write_triggers, Clock, Step, StepResult};
use sw_runtime::ContainerRuntime;

pub fn handle<R: ContainerRuntime, C: Clock>(ctx: &HandlerCtx<'_, R, C>, step: &Step) -> Result<(), EngineError> {
    let Ok((_, config)) = step.discriminate() else {
        return finish_failure(ctx, step.id, "step settings missing docker_build discriminator");
    };
    let Some(task) = ctx.store.read_task(step.task_id)? else {
        return finish_failure(ctx, step.id, format!("owning task {} not found", step.task_id));
    };
    let image_tag = task.image_tag();
    if image_tag.is_empty() {
        return finish_failure(ctx, step.id, "owning task has no declared image_tag");
    }

    let mut triggers = read_triggers(config);
    fix_dockefile_typo(&mut triggers);
    let params = strip_platform_tokens(config.get("params").and_then(Value::as_array));

    let mut new_config = config.clone();
    new_config["params"] = json!(params);

    let force = config.get("force").and_then(Value::as_bool).unwrap_or(false);
    let trigger_input = TriggerInput {
        triggers: &triggers,
        base_path: task.local_path.as_deref(),
        force,
        generated_file: None,
        image_identity: Some(ImageIdentityExpectation { image_tag: &image_tag, expected_image_id: task.image_id().as_deref() }),
    };

    if !should_run(&trigger_input, ctx.runtime) {
        persist(ctx, step, new_config, &triggers)?;
        return finish_success(ctx, step.id, StepResult::success());
    }

    let Some(context_dir) = task.local_path.clone() else {
        return finish_failure(ctx, step.id, "owning task has no local_path to build from");
    };
    if let Err(err) = ctx.runtime.build(&params, &image_tag, &context_dir, task.platform().as_deref()) {
        return finish_failure(ctx, step.id, format!("build failed: {err}"));
    }
    let image_id = match ctx.runtime.inspect_image_id(&image_tag) {
        Ok(id) => id,
        Err(err) => return finish_failure(ctx, step.id, format!("inspect after build failed: {err}")),
    };

    ctx.store.write_task_settings(task.id, &task.with_image_id(&image_id))?;

    if let Some(base) = &task.local_path {
        for (path, hash) in triggers.iter_mut() {
            if let Ok(fresh) = sw_hash::hash_file(&base.join(path.as_str())) {
                *hash = fresh;
            }
        }
    }

    persist(ctx, step, new_config, &triggers)?;
    finish_success(ctx, step.id, StepResult::success().with_image_id(image_id))
}

/// Persists the cleaned params and refreshed/typo-fixed trigger set back
/// into the step's settings — never `image_id`/`image_tag` (§4.6).
fn persist<R: ContainerRuntime, C: Clock>(
    ctx: &HandlerCtx<'_, R, C>,
    step: &Step,
    config: Value,
    triggers: &sw_core::TriggerSet,
) -> Result<(), EngineError> {
    let config = write_triggers(&config, triggers);
    ctx.store.update_step_settings(step.id, &json!({"docker_build": config}))?;
    Ok(())
}

/// Strips `--platform <value>` and `--platform=<value>` tokens from the
/// recorded parameter list (§4.6, §8 scenario 4).
fn strip_platform_tokens(params: Option<&Vec<Value>>) -> Vec<String> {
    let raw: Vec<String> = params.map(|arr| arr.iter().filter_map(|v| v.as_str().map(str::to_string)).collect()).unwrap_or_default();
    let mut out = Vec::new();
    let mut iter = raw.into_iter();
    while let Some(token) = iter.next() {
        if token == "--platform" {
            iter.next();
            continue;
        }
        if token.starts_with("--platform=") {
            continue;
        }
        out.push(token);
    }
    out
}

#[cfg(test)]
#[path = "docker_build_tests.rs"]
mod tests;
