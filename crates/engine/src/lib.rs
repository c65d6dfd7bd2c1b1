// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The orchestration engine (§4.4-§4.8): dependency resolution, the
//! trigger evaluator, one handler per step kind, the generated-step
//! materialiser, and the dispatcher that ties them together into a tick.

mod dependency;
mod dispatcher;
mod error;
mod handlers;
mod materialize;
mod trigger;

#[cfg(test)]
pub mod test_support;

pub use error::EngineError;
pub use handlers::HandlerCtx;
use sw_core::Clock;
use sw_runtime::ContainerRuntime;
use sw_store::SqliteStore;

/// Owns the store, runtime adapter, and clock a tick needs, and drives
/// the tick loop (§4.7).
pub struct Engine<R: ContainerRuntime, C: Clock> {
    store: SqliteStore<C>,
    runtime: R,
    clock: C,
}

impl<R: ContainerRuntime, C: Clock> Engine<R, C> {
    pub fn new(store: SqliteStore<C>, runtime: R, clock: C) -> Self {
        Self { store, runtime, clock }
    }

    /// Runs one tick (§4.7) over every step kind in dispatch order.
    pub fn tick(&self) -> Result<(), EngineError> {
        let ctx = HandlerCtx { store: &self.store, runtime: &self.runtime, clock: &self.clock };
        dispatcher::tick(&ctx)
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
