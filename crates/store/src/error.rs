// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store adapter errors (§4.3, §7 "Store-access failure").

use sw_core::{StepId, TaskId};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("settings column for step {0} did not contain valid JSON: {1}")]
    MalformedSettings(StepId, serde_json::Error),

    #[error("task {0} not found")]
    TaskNotFound(TaskId),

    #[error("step {0} not found")]
    StepNotFound(StepId),

    #[error("edit path component `{segment}` is not an object")]
    NotAnObject { segment: String },

    #[error("store mutex poisoned")]
    Poisoned,
}
