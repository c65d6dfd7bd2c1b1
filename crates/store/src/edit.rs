// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dotted-path editing of a settings document (§4.3 "Edit-field operation").
//!
//! `serde_json::Value` already keeps an integer distinct from a float with
//! the same magnitude (`Number` carries its original representation), so
//! round-tripping through this module never turns `1` into `1.0`.

use crate::StoreError;
use serde_json::{Map, Value};

/// Walks `dotted_path` into `settings`, creating missing intermediate
/// objects, and sets the final segment to `value`. Refuses if an existing
/// intermediate node is not an object.
pub fn edit_field(settings: &Value, dotted_path: &str, value: Value) -> Result<Value, StoreError> {
    let segments: Vec<&str> = dotted_path.split('.').collect();
    let mut root = settings.as_object().cloned().unwrap_or_default();
    set_path(&mut root, &segments, value)?;
    Ok(Value::Object(root))
}

// Allow expect here: `str::split` always yields at least one element, even for "".
#[allow(clippy::expect_used)]
fn set_path(map: &mut Map<String, Value>, segments: &[&str], value: Value) -> Result<(), StoreError> {
    let (head, rest) = segments.split_first().expect("dotted path has at least one segment");
    if rest.is_empty() {
        map.insert(head.to_string(), value);
        return Ok(());
    }
    let entry = map.entry(head.to_string()).or_insert_with(|| Value::Object(Map::new()));
    let child = entry
        .as_object_mut()
        .ok_or_else(|| StoreError::NotAnObject { segment: head.to_string() })?;
    set_path(child, rest, value)
}

/// Reads the value at `dotted_path`, or `None` if any segment is absent.
pub fn read_field<'a>(settings: &'a Value, dotted_path: &str) -> Option<&'a Value> {
    dotted_path.split('.').try_fold(settings, |node, segment| node.get(segment))
}

#[cfg(test)]
#[path = "edit_tests.rs"]
mod tests;
