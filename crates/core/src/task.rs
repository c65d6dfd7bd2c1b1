// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task: the named workload envelope that owns a set of steps.

use crate::ids::TaskId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Status of a task row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Active,
    Inactive,
    Disabled,
    Running,
}

crate::simple_display! {
    TaskStatus {
        Active => "active",
        Inactive => "inactive",
        Disabled => "disabled",
        Running => "running",
    }
}

impl TaskStatus {
    pub fn is_active(self) -> bool {
        matches!(self, TaskStatus::Active)
    }
}

/// A task row as read from the store.
///
/// `settings` carries a `docker` sub-document with the task's image
/// identity (`image_tag`, optional `image_id`, optional `platform`). Step
/// handlers read and write that sub-document through the helpers below
/// rather than poking at the JSON directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_path: Option<PathBuf>,
    pub settings: Value,
}

impl Task {
    /// Returns the `docker` sub-document, or an empty object if absent.
    fn docker_doc(&self) -> Map<String, Value> {
        self.settings
            .get("docker")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default()
    }

    /// The task's published image tag, the identity under which its built
    /// image is known. Empty string if unset.
    pub fn image_tag(&self) -> String {
        self.docker_doc()
            .get("image_tag")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    /// The authoritative SHA-256 digest of the task's built image, if known.
    pub fn image_id(&self) -> Option<String> {
        self.docker_doc()
            .get("image_id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .filter(|s| !s.is_empty())
    }

    /// The platform string (e.g. `linux/amd64`), if declared.
    pub fn platform(&self) -> Option<String> {
        self.docker_doc()
            .get("platform")
            .and_then(Value::as_str)
            .map(str::to_string)
            .filter(|s| !s.is_empty())
    }

    /// Returns `settings` with `docker.image_id` set to `image_id`,
    /// creating the `docker` object if it did not exist.
    ///
    /// This is how `docker_build` (§4.6) records the freshly built image's
    /// digest: into the *task's* settings, never the step's, so that
    /// multiple build steps sharing a task stay in sync.
    pub fn with_image_id(&self, image_id: &str) -> Value {
        let mut settings = self.settings.as_object().cloned().unwrap_or_default();
        let mut docker = self.docker_doc();
        docker.insert("image_id".to_string(), Value::String(image_id.to_string()));
        settings.insert("docker".to_string(), Value::Object(docker));
        Value::Object(settings)
    }

    /// Resolve a path relative to the task's local base path.
    ///
    /// Returns `None` if the task has no base path configured.
    pub fn resolve(&self, relative: &str) -> Option<PathBuf> {
        self.local_path.as_ref().map(|base| base.join(relative))
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
