// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Generated-step materialiser (§4.8): synthesises, updates, and deletes
//! `rubric_shell` steps from a parsed rubric's criteria, preserving
//! identity by `criterion_id`.
//!
//! A criterion's generated command list runs its `held_out_test`, if any,
//! under a single label keyed by its own `criterion_id`; a criterion with
//! no held-out test materialises an empty command list, which always
//! succeeds (§4.6 `docker_shell` aggregate rule: no commands, no failures).

use crate::error::EngineError;
use crate::handlers::HandlerCtx;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use sw_core::{Clock, Criterion, StepId, TaskId};
use sw_runtime::ContainerRuntime;

/// One criterion paired with the stable key the caller wants it addressed
/// by. `dynamic_lab`/`dynamic_rubric` use [`Criterion::criterion_id`];
/// `rubric_set` uses the criterion's title (§4.6).
pub fn materialize<R: ContainerRuntime, C: Clock>(
    ctx: &HandlerCtx<'_, R, C>,
    task_id: TaskId,
    producer_id: StepId,
    dependency_id: StepId,
    criteria: &[(String, Criterion)],
) -> Result<(), EngineError> {
    let existing = ctx.store.get_generated_steps(producer_id)?;
    let mut existing_by_id = HashMap::new();
    for step in existing {
        if let Ok((_, config)) = step.discriminate() {
            if let Some(cid) = config.get("criterion_id").and_then(Value::as_str) {
                existing_by_id.insert(cid.to_string(), step);
            }
        }
    }

    let mut kept = HashSet::new();
    for (criterion_id, criterion) in criteria {
        let command = criterion_command(criterion_id, criterion);
        let new_config = json!({
            "command": command,
            "criterion_id": criterion_id,
            "counter": criterion.counter,
            "score": criterion.score,
            "required": criterion.required,
            "depends_on": [{"id": dependency_id.get()}],
            "generated_by": producer_id.get(),
        });

        if let Some(existing_step) = existing_by_id.get(criterion_id) {
            kept.insert(criterion_id.clone());
            let same_title = existing_step.title == criterion.title;
            let same_config = existing_step
                .discriminate()
                .ok()
                .map(|(_, cfg)| {
                    cfg.get("command") == new_config.get("command")
                        && cfg.get("score") == new_config.get("score")
                        && cfg.get("required") == new_config.get("required")
                        && cfg.get("counter") == new_config.get("counter")
                })
                .unwrap_or(false);
            if !same_title || !same_config {
                ctx.store.update_step(existing_step.id, &criterion.title, &json!({"rubric_shell": new_config}))?;
            }
        } else {
            ctx.store.create_step(task_id, &criterion.title, &json!({"rubric_shell": new_config}))?;
            kept.insert(criterion_id.clone());
        }
    }

    for (criterion_id, step) in existing_by_id {
        if !kept.contains(&criterion_id) {
            ctx.store.delete_step(step.id)?;
        }
    }
    Ok(())
}

fn criterion_command(criterion_id: &str, criterion: &Criterion) -> Value {
    match &criterion.held_out_test {
        Some(test) => json!([{ criterion_id: test }]),
        None => json!([]),
    }
}

#[cfg(test)]
#[path = "materialize_tests.rs"]
mod tests;
