// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Criterion: one scored line item of a rubric.

use serde::{Deserialize, Serialize};

/// A single scored line item, as parsed from a rubric document or recorded
/// in a `rubric_set` step's settings (GLOSSARY: "Criterion").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    /// Stable ordinal within the rubric; drives the generated step's title
    /// and the criterion_id bijection (§4.8).
    pub counter: u32,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default)]
    pub required: bool,
    pub rubric_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub held_out_test: Option<String>,
}

impl Criterion {
    /// The stable identifier used to match a criterion back to the
    /// generated step that checks it (§4.8 "criterion_id bijection").
    pub fn criterion_id(&self) -> String {
        format!("criterion-{}", self.counter)
    }
}

#[cfg(test)]
#[path = "criterion_tests.rs"]
mod tests;
