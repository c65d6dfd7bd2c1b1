// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Row identifiers for the two owned tables.

crate::define_int_id! {
    /// Primary key of `tasks`.
    pub struct TaskId;
}

crate::define_int_id! {
    /// Primary key of `steps`.
    pub struct StepId;
}
