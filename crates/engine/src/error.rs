// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dispatcher-level errors (§7 taxonomy case 5): the only error category
//! allowed to propagate out of a tick. Everything a handler encounters is
//! caught locally and turned into a `failure`/`error` result document.

use sw_core::TaskId;
use sw_store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("bulk select for a tick failed: {0}")]
    Store(#[from] StoreError),

    #[error("task {0} referenced by a step does not exist")]
    MissingTask(TaskId),
}
