// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trigger sets: the recorded mapping from tracked file to last-seen hash.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Historical key that predates the `triggers.files` nesting; still read
/// for backward compatibility (§3 "Trigger set").
const LEGACY_FILES_KEY: &str = "files";

/// A known typo the source data carries forward; the build handler fixes
/// it in place on every tick (§4.6 scenario 3).
pub const TYPO_KEY: &str = "Dockefile";
pub const FIXED_KEY: &str = "Dockerfile";

/// Mapping from relative file path to its last-observed SHA-256 hex digest.
pub type TriggerSet = BTreeMap<String, String>;

/// Reads a step's `triggers.files` map, falling back to the legacy
/// top-level `files` key if `triggers` is absent.
pub fn read_triggers(config: &Value) -> TriggerSet {
    if let Some(map) = config.get("triggers").and_then(|t| t.get("files")).and_then(Value::as_object) {
        return map_to_trigger_set(map);
    }
    if let Some(map) = config.get(LEGACY_FILES_KEY).and_then(Value::as_object) {
        return map_to_trigger_set(map);
    }
    TriggerSet::new()
}

fn map_to_trigger_set(map: &Map<String, Value>) -> TriggerSet {
    map.iter()
        .filter_map(|(k, v)| v.as_str().map(|hash| (k.clone(), hash.to_string())))
        .collect()
}

/// Writes a trigger set back into `triggers.files` of a configuration
/// value, creating the `triggers` object if absent. Leaves every other
/// field of `config` untouched.
pub fn write_triggers(config: &Value, triggers: &TriggerSet) -> Value {
    let mut config = config.as_object().cloned().unwrap_or_default();
    let mut triggers_doc = config
        .get("triggers")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    let files: Map<String, Value> = triggers
        .iter()
        .map(|(path, hash)| (path.clone(), Value::String(hash.clone())))
        .collect();
    triggers_doc.insert("files".to_string(), Value::Object(files));
    config.insert("triggers".to_string(), Value::Object(triggers_doc));
    config.remove(LEGACY_FILES_KEY);
    Value::Object(config)
}

/// Renames the `Dockefile` key to `Dockerfile` in place, if present
/// (§4.6, §8 scenario 3). Returns `true` if a rename happened.
pub fn fix_dockefile_typo(triggers: &mut TriggerSet) -> bool {
    if let Some(hash) = triggers.remove(TYPO_KEY) {
        triggers.entry(FIXED_KEY.to_string()).or_insert(hash);
        true
    } else {
        false
    }
}

#[cfg(test)]
#[path = "trigger_tests.rs"]
mod tests;
