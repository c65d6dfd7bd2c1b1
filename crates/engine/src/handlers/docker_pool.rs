// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `docker_pool` (§10.6 supplement): a pure dependency-gate step, fanning
//! several upstream steps into one downstream dependency point.

use super::{finish_success, HandlerCtx};
use crate::dependency::ready;
use crate::error::EngineError;
use sw_core::{Clock, Step, StepResult};
use sw_runtime::ContainerRuntime;

pub fn handle<R: ContainerRuntime, C: Clock>(ctx: &HandlerCtx<'_, R, C>, step: &Step) -> Result<(), EngineError> {
    if ready(step, ctx.store) {
        finish_success(ctx, step.id, StepResult::success())
    } else {
        Ok(())
    }
}

#[cfg(test)]
#[path = "docker_pool_tests.rs"]
mod tests;
