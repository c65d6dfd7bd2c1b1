// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rubric markdown parsing (GLOSSARY "Criterion"): turns a rubric file
//! into an ordered list of scored criteria for `dynamic_lab`,
//! `dynamic_rubric`, and `rubric_set` (§4.6).
//!
//! A criterion heading looks like:
//!
//! ```text
//! ## 3. The patch compiles cleanly [required] (score: 2)
//! Rubric text describing what's being checked goes here, possibly
//! spanning several lines.
//! held_out_test: pytest tests/test_compiles.py
//! ```

use regex::Regex;
use std::sync::LazyLock;
use sw_core::Criterion;

// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^##\s*(\d+)\.\s*(.+)$").expect("constant regex pattern is valid"));
#[allow(clippy::expect_used)]
static REQUIRED_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[required\]").expect("constant regex pattern is valid"));
#[allow(clippy::expect_used)]
static SCORE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\(score:\s*([0-9]+(?:\.[0-9]+)?)\)").expect("constant regex pattern is valid"));
#[allow(clippy::expect_used)]
static HELD_OUT_TEST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^held_out_test:\s*(.+)$").expect("constant regex pattern is valid"));

#[derive(Debug, thiserror::Error)]
pub enum RubricError {
    #[error("rubric contains no criterion headings")]
    Empty,
}

/// Parses a rubric markdown document into its ordered criteria.
///
/// Criteria are returned in the order their headings appear, regardless
/// of the numeric counter in the heading (a malformed or reordered file
/// still parses; the counter is taken at face value for `criterion_id`
/// purposes, not re-derived from position).
pub fn parse_rubric(markdown: &str) -> Result<Vec<Criterion>, RubricError> {
    let mut criteria = Vec::new();
    let mut current: Option<(u32, String, bool, Option<f64>)> = None;
    let mut body_lines: Vec<String> = Vec::new();
    let mut held_out_test: Option<String> = None;

    let flush = |current: &mut Option<(u32, String, bool, Option<f64>)>,
                 body_lines: &mut Vec<String>,
                 held_out_test: &mut Option<String>,
                 criteria: &mut Vec<Criterion>| {
        if let Some((counter, title, required, score)) = current.take() {
            criteria.push(Criterion {
                counter,
                title,
                score,
                required,
                rubric_text: body_lines.join("\n").trim().to_string(),
                held_out_test: held_out_test.take(),
            });
        }
        body_lines.clear();
    };

    for line in markdown.lines() {
        if let Some(caps) = HEADING.captures(line) {
            flush(&mut current, &mut body_lines, &mut held_out_test, &mut criteria);
            let counter: u32 = caps[1].parse().unwrap_or_default();
            let raw_title = &caps[2];
            let required = REQUIRED_MARKER.is_match(raw_title);
            let score = SCORE_MARKER.captures(raw_title).and_then(|c| c[1].parse::<f64>().ok());
            let title = REQUIRED_MARKER.replace_all(raw_title, "");
            let title = SCORE_MARKER.replace_all(&title, "").trim().to_string();
            current = Some((counter, title, required, score));
            continue;
        }
        if current.is_none() {
            continue;
        }
        if let Some(caps) = HELD_OUT_TEST.captures(line) {
            held_out_test = Some(caps[1].trim().to_string());
            continue;
        }
        body_lines.push(line.to_string());
    }
    flush(&mut current, &mut body_lines, &mut held_out_test, &mut criteria);

    if criteria.is_empty() {
        return Err(RubricError::Empty);
    }
    Ok(criteria)
}

#[cfg(test)]
#[path = "rubric_tests.rs"]
mod tests;
