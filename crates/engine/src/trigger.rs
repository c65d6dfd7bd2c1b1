// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trigger evaluator (§4.5): decides `should_run` for hash-gated step
//! kinds, in six ordered rules, plus the separate `docker_pull` time gate.

use chrono::{DateTime, Utc};
use std::path::Path;
use sw_core::TriggerSet;
use sw_runtime::ContainerRuntime;
use tracing::warn;

/// The image-identity expectation a hash-gated step may carry (rule 4):
/// the task's published tag must still resolve to the recorded digest.
pub struct ImageIdentityExpectation<'a> {
    pub image_tag: &'a str,
    pub expected_image_id: Option<&'a str>,
}

/// Everything `should_run` needs, gathered by the caller so this module
/// stays free of store/task lookups.
pub struct TriggerInput<'a> {
    pub triggers: &'a TriggerSet,
    pub base_path: Option<&'a Path>,
    pub force: bool,
    /// A designated generated-file output whose absence alone forces a run.
    pub generated_file: Option<&'a Path>,
    pub image_identity: Option<ImageIdentityExpectation<'a>>,
}

/// §4.5 rules 1-6, evaluated in order; the first rule that fires decides.
pub fn should_run<R: ContainerRuntime>(input: &TriggerInput<'_>, runtime: &R) -> bool {
    if input.force {
        return true;
    }
    if input.triggers.is_empty() {
        return true;
    }
    if let Some(path) = input.generated_file {
        if !path.exists() {
            return true;
        }
    }
    if let Some(expect) = &input.image_identity {
        match runtime.inspect_image_id(expect.image_tag) {
            Err(_) => return true,
            Ok(digest) => {
                let digest = sw_runtime::normalize_digest(&digest);
                let expected = expect.expected_image_id.map(sw_runtime::normalize_digest);
                if expected != Some(digest) {
                    return true;
                }
            }
        }
    }
    for (relative, recorded_hash) in input.triggers {
        let current = input.base_path.map(|base| base.join(relative)).and_then(|path| sw_hash::hash_file(&path).ok());
        match current {
            Some(hash) if &hash == recorded_hash => {}
            _ => return true,
        }
    }
    false
}

/// Whether a `docker_pull` step's time gate still blocks a run. An
/// unparseable timestamp is treated as "no gate" (§4.5) and logged.
pub fn time_gated(prevent_run_before: Option<&str>, now: DateTime<Utc>) -> bool {
    match prevent_run_before {
        None => false,
        Some(raw) => match raw.parse::<DateTime<Utc>>() {
            Ok(gate) => now < gate,
            Err(err) => {
                warn!(raw, %err, "unparseable prevent_run_before, treating as no gate");
                false
            }
        },
    }
}

#[cfg(test)]
#[path = "trigger_tests.rs"]
mod tests;
