// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `docker_pull` (§4.6): dependency-gated, time-gated image pull.

use super::{finish_failure, finish_success, HandlerCtx};
use crate::dependency::ready;
use crate::error::EngineError;
use crate::trigger::time_gated;
use chrono::Duration;
use serde_json::{json, Value};
use sw_core::{Clock, Step, StepResult};
use sw_runtime::ContainerRuntime;

const PULL_COOLDOWN_HOURS: i64 = 6;

pub fn handle<R: ContainerRuntime, C: Clock>(ctx: &HandlerCtx<'_, R, C>, step: &Step) -> Result<(), EngineError> {
    let Ok((_, config)) = step.discriminate() else {
        return finish_failure(ctx, step.id, "step settings missing docker_pull discriminator");
    };

    if !ready(step, ctx.store) {
        return Ok(());
    }
    let prevent_run_before = config.get("prevent_run_before").and_then(Value::as_str);
    if time_gated(prevent_run_before, ctx.clock.now()) {
        return Ok(());
    }

    let image_tag = config.get("image_tag").and_then(Value::as_str).unwrap_or_default();
    if image_tag.is_empty() {
        return finish_failure(ctx, step.id, "docker_pull missing image_tag");
    }

    if let Err(err) = ctx.runtime.pull(image_tag) {
        return finish_failure(ctx, step.id, format!("pull failed: {err}"));
    }
    let digest = match ctx.runtime.inspect_image_id(image_tag) {
        Ok(digest) => digest,
        Err(err) => return finish_failure(ctx, step.id, format!("inspect after pull failed: {err}")),
    };

    let new_gate = (ctx.clock.now() + Duration::hours(PULL_COOLDOWN_HOURS)).to_rfc3339();
    let mut new_config = config.clone();
    new_config["image_id"] = json!(digest);
    new_config["prevent_run_before"] = json!(new_gate);
    ctx.store.update_step_settings(step.id, &json!({"docker_pull": new_config}))?;

    finish_success(ctx, step.id, StepResult::success().with_image_id(digest))
}

#[cfg(test)]
#[path = "docker_pull_tests.rs"]
mod tests;
