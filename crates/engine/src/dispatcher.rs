// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tick loop (§4.7): visits every step kind in dispatch order, dispatching
//! each pending step to its handler. A handler failure is logged and
//! isolated (§7 case 4); only the bulk `select_pending` read at the top
//! of each kind's batch is allowed to abort the tick (§7 case 5).

use crate::error::EngineError;
use crate::handlers::{dispatch, HandlerCtx};
use sw_core::{Clock, StepKind};
use sw_runtime::ContainerRuntime;
use tracing::{info, warn};

/// Runs one full tick: every kind in [`StepKind::DISPATCH_ORDER`], every
/// pending step of that kind, in ascending step-id order.
pub fn tick<R: ContainerRuntime, C: Clock>(ctx: &HandlerCtx<'_, R, C>) -> Result<(), EngineError> {
    let mut dispatched = 0usize;
    for kind in StepKind::DISPATCH_ORDER {
        let pending = ctx.store.select_pending(kind, None)?;
        for step in pending {
            if let Err(err) = dispatch(ctx, kind, &step) {
                warn!(step_id = %step.id, kind = kind.discriminator(), error = %err, "step dispatch failed; continuing tick");
                continue;
            }
            dispatched += 1;
        }
    }
    info!(dispatched, "tick complete");
    Ok(())
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
