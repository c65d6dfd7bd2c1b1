// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `docker_run` (§10.6 supplement): the read-only sibling of
//! `docker_shell` — resolves image identity and confirms a running
//! container exists, with no command execution and no triggers.

use super::{finish_failure, finish_success, HandlerCtx};
use crate::dependency::inherit_image_identity;
use crate::error::EngineError;
use serde_json::Value;
use sw_core::{Clock, Step, StepResult};
use sw_runtime::ContainerRuntime;

pub fn handle<R: ContainerRuntime, C: Clock>(ctx: &HandlerCtx<'_, R, C>, step: &Step) -> Result<(), EngineError> {
    let Ok((_, config)) = step.discriminate() else {
        return finish_failure(ctx, step.id, "step settings missing docker_run discriminator");
    };
    let own = config.get("docker").and_then(Value::as_object);
    let own_tag = own.and_then(|d| d.get("image_tag")).and_then(Value::as_str).filter(|s| !s.is_empty());
    let own_id = own.and_then(|d| d.get("image_id")).and_then(Value::as_str).filter(|s| !s.is_empty());
    let (image_id, image_tag) = match (own_id, own_tag) {
        (Some(id), Some(tag)) => (Some(id.to_string()), Some(tag.to_string())),
        _ => inherit_image_identity(step, ctx.store),
    };
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

    let mut result = StepResult::success().with_container_id(container_id);
    if let Some(image_id) = image_id {
        result = result.with_image_id(image_id);
    }
    finish_success(ctx, step.id, result)
}

#[cfg(test)]
#[path = "docker_run_tests.rs"]
mod tests;
