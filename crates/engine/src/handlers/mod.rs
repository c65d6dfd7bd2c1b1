// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One module per step kind (§4.6). Every handler shares the outer shape:
//! decode settings, evaluate triggers, run side effects through the
//! runtime adapter if triggered, persist settings and results.

mod docker_build;
mod docker_pool;
mod docker_pull;
mod docker_run;
mod docker_shell;
mod dynamic_rubric;
mod file_exists;
mod model_task_check;
mod rubric_set;

use crate::error::EngineError;
use sw_core::{Clock, Step, StepId, StepKind, StepResult};
use sw_runtime::ContainerRuntime;
use sw_store::SqliteStore;

/// Shared handles every handler needs: the store, the runtime adapter,
/// and a clock for anything time-gated.
pub struct HandlerCtx<'a, R: ContainerRuntime, C: Clock> {
    pub store: &'a SqliteStore<C>,
    pub runtime: &'a R,
    pub clock: &'a C,
}

/// Routes one step to the handler for `kind`. `select_pending` has
/// already guaranteed `step`'s settings carry that discriminator.
pub fn dispatch<R: ContainerRuntime, C: Clock>(ctx: &HandlerCtx<'_, R, C>, kind: StepKind, step: &Step) -> Result<(), EngineError> {
    match kind {
        StepKind::DockerBuild => docker_build::handle(ctx, step),
        StepKind::DockerPull => docker_pull::handle(ctx, step),
        StepKind::DockerRun => docker_run::handle(ctx, step),
        StepKind::DockerPool => docker_pool::handle(ctx, step),
        StepKind::DockerShell => docker_shell::handle(ctx, step),
        StepKind::FileExists => file_exists::handle(ctx, step),
        StepKind::DynamicLab => dynamic_rubric::handle_dynamic_lab(ctx, step),
        StepKind::DynamicRubric => dynamic_rubric::handle_dynamic_rubric(ctx, step),
        StepKind::RubricSet => rubric_set::handle(ctx, step),
        StepKind::RubricShell => docker_shell::handle_rubric_shell(ctx, step),
        StepKind::ModelTaskCheck => model_task_check::handle(ctx, step),
    }
}

/// Writes a `failure` result and returns `Ok`: handler-level problems
/// never propagate out of a tick (§7 case 1, case 3).
// Allow expect here: `StepResult` has no field that can fail to serialise.
#[allow(clippy::expect_used)]
fn finish_failure<R: ContainerRuntime, C: Clock>(
    ctx: &HandlerCtx<'_, R, C>,
    step_id: StepId,
    message: impl Into<String>,
) -> Result<(), EngineError> {
    let result = StepResult::failure(message);
    ctx.store.update_step_results(step_id, &serde_json::to_value(result).expect("StepResult always serialises"))?;
    Ok(())
}

// Allow expect here: `StepResult` has no field that can fail to serialise.
#[allow(clippy::expect_used)]
fn finish_success<R: ContainerRuntime, C: Clock>(ctx: &HandlerCtx<'_, R, C>, step_id: StepId, result: StepResult) -> Result<(), EngineError> {
    ctx.store.update_step_results(step_id, &serde_json::to_value(result).expect("StepResult always serialises"))?;
    Ok(())
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
