// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn substitutes_all_three_tokens() {
    let sample = "Task: {YOUR_TASK_PROMPT}\nRubric: {YOUR_RUBRIC}\nPatch: {held_out_test_patch}";
    let rendered = render(sample, "do the thing", "score it well", "diff --git a b");
    assert_eq!(rendered, "Task: do the thing\nRubric: score it well\nPatch: diff --git a b");
}

#[test]
fn leaves_absent_tokens_untouched() {
    let rendered = render("no tokens here", "x", "y", "z");
    assert_eq!(rendered, "no tokens here");
}

#[test]
fn substitutes_repeated_occurrences() {
    let rendered = render("{YOUR_RUBRIC} and {YOUR_RUBRIC}", "t", "R", "p");
    assert_eq!(rendered, "R and R");
}
