// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn criterion(counter: u32) -> Criterion {
    Criterion {
        counter,
        title: "does it compile".to_string(),
        score: None,
        required: true,
        rubric_text: "the patch must compile".to_string(),
        held_out_test: None,
    }
}

#[test]
fn criterion_id_is_stable_per_counter() {
    assert_eq!(criterion(1).criterion_id(), "criterion-1");
    assert_eq!(criterion(2).criterion_id(), "criterion-2");
}
