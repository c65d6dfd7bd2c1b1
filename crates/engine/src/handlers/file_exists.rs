// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `file_exists` (§4.6, §9 open question iii): no side effects, just a
//! presence check under the owning task's base path.

use super::{finish_failure, finish_success, HandlerCtx};
use crate::error::EngineError;
use serde_json::Value;
use sw_core::{Clock, Step, StepResult};
use sw_runtime::ContainerRuntime;

pub fn handle<R: ContainerRuntime, C: Clock>(ctx: &HandlerCtx<'_, R, C>, step: &Step) -> Result<(), EngineError> {
    let Ok((_, config)) = step.discriminate() else {
        return finish_failure(ctx, step.id, "step settings missing file_exists discriminator");
    };
    let Some(task) = ctx.store.read_task(step.task_id)? else {
        return finish_failure(ctx, step.id, format!("owning task {} not found", step.task_id));
    };
    let files = config.get("files").and_then(Value::as_array).cloned().unwrap_or_default();

    let missing: Vec<String> = files
        .iter()
        .filter_map(|v| v.as_str())
        .filter(|relative| match task.resolve(relative) {
            Some(path) => !path.exists(),
            None => true,
        })
        .map(str::to_string)
        .collect();

    if missing.is_empty() {
        finish_success(ctx, step.id, StepResult::success())
    } else {
        finish_failure(ctx, step.id, format!("missing files: {}", missing.join(", ")))
    }
}

#[cfg(test)]
#[path = "file_exists_tests.rs"]
mod tests;
