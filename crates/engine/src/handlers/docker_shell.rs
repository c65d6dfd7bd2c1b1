// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `docker_shell` (§4.6) and its generated sibling `rubric_shell`: resolve
//! a running container's image identity, then run an ordered command list
//! inside it, collecting per-label output.

use super::{finish_failure, finish_success, HandlerCtx};
use crate::dependency::inherit_image_identity;
use crate::error::EngineError;
use serde_json::Value;
use sw_core::{Clock, CommandOutput, Step, StepResult};
use sw_runtime::{normalize_digest, ContainerRuntime};

pub fn handle<R: ContainerRuntime, C: Clock>(ctx: &HandlerCtx<'_, R, C>, step: &Step) -> Result<(), EngineError> {
    let Ok((_, config)) = step.discriminate() else {
        return finish_failure(ctx, step.id, "step settings missing docker_shell discriminator");
    };
    let own = config.get("docker").and_then(Value::as_object);
    let own_tag = own.and_then(|d| d.get("image_tag")).and_then(Value::as_str).filter(|s| !s.is_empty());
    let own_id = own.and_then(|d| d.get("image_id")).and_then(Value::as_str).filter(|s| !s.is_empty());
    let (image_id, image_tag) = match (own_id, own_tag) {
        (Some(id), Some(tag)) => (Some(id.to_string()), Some(tag.to_string())),
        _ => inherit_image_identity(step, ctx.store),
    };
    run_shell(ctx, step, config, image_id, image_tag)
}

/// `rubric_shell` steps carry no `docker` sub-document of their own;
/// identity always comes from the `depends_on` chain the materialiser set up.
pub fn handle_rubric_shell<R: ContainerRuntime, C: Clock>(ctx: &HandlerCtx<'_, R, C>, step: &Step) -> Result<(), EngineError> {
    let Ok((_, config)) = step.discriminate() else {
        return finish_failure(ctx, step.id, "step settings missing rubric_shell discriminator");
    };
    let (image_id, image_tag) = inherit_image_identity(step, ctx.store);
    run_shell(ctx, step, config, image_id, image_tag)
}

fn run_shell<R: ContainerRuntime, C: Clock>(
    ctx: &HandlerCtx<'_, R, C>,
    step: &Step,
    config: &Value,
    image_id: Option<String>,
    image_tag: Option<String>,
) -> Result<(), EngineError> {
    let Some(image_tag) = image_tag else {
        return finish_failure(ctx, step.id, "no image identity available to locate a container");
    };
    let containers = match ctx.runtime.list_containers_by_ancestor(&image_tag) {
        Ok(c) => c,
        Err(err) => return finish_failure(ctx, step.id, format!("listing containers failed: {err}")),
    };
    let Some(container_id) = containers.into_iter().next() else {
        return finish_failure(ctx, step.id, format!("no running container for ancestor image {image_tag}"));
    };
    let actual_digest = match ctx.runtime.inspect_container_image(&container_id) {
        Ok(d) => d,
        Err(err) => return finish_failure(ctx, step.id, format!("inspecting container image failed: {err}")),
    };
    if let Some(expected) = &image_id {
        if normalize_digest(expected) != normalize_digest(&actual_digest) {
            return finish_failure(
                ctx,
                step.id,
                format!("container image digest {actual_digest} does not match expected {expected}"),
            );
        }
    }

    let commands = config.get("command").and_then(Value::as_array).cloned().unwrap_or_default();
    let mut outputs = Vec::with_capacity(commands.len());
    for entry in &commands {
        let Some((label, shell)) = entry.as_object().and_then(|obj| obj.iter().next()).and_then(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string()))) else {
            outputs.push(CommandOutput::failed("<malformed>", "command entry is not a single-key {label: shell} object"));
            continue;
        };
        match ctx.runtime.exec_in_container(&container_id, &shell) {
            Ok(outcome) if outcome.success => outputs.push(CommandOutput::ok(label, outcome.stdout)),
            Ok(outcome) => outputs.push(CommandOutput::failed(label, outcome.stderr)),
            Err(err) => outputs.push(CommandOutput::failed(label, err.to_string())),
        }
    }

    let result = StepResult::success().with_container_id(container_id).with_image_id(actual_digest).with_outputs(outputs);
    finish_success(ctx, step.id, result)
}

#[cfg(test)]
#[path = "docker_shell_tests.rs"]
mod tests;
