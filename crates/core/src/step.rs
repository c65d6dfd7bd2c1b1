// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Step: the unit of work owned by exactly one task.

use crate::ids::{StepId, TaskId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The closed set of step kinds, named by the single top-level
/// discriminator key that appears in a step's settings document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    DockerBuild,
    DockerPull,
    DockerRun,
    DockerPool,
    DockerShell,
    FileExists,
    DynamicLab,
    DynamicRubric,
    RubricSet,
    RubricShell,
    ModelTaskCheck,
}

impl StepKind {
    /// All known kinds, in the dispatcher's fixed processing order (§4.7,
    /// §5 "Across kinds, the order is fixed by the dispatcher's kind
    /// table"). Dependency-providing kinds (builds, pulls) are visited
    /// before the kinds most likely to depend on them.
    pub const DISPATCH_ORDER: [StepKind; 11] = [
        StepKind::DockerBuild,
        StepKind::DockerPull,
        StepKind::DockerRun,
        StepKind::DockerPool,
        StepKind::DockerShell,
        StepKind::FileExists,
        StepKind::DynamicLab,
        StepKind::DynamicRubric,
        StepKind::RubricSet,
        StepKind::RubricShell,
        StepKind::ModelTaskCheck,
    ];

    /// The discriminator key as it appears in a settings JSON document.
    pub fn discriminator(self) -> &'static str {
        match self {
            StepKind::DockerBuild => "docker_build",
            StepKind::DockerPull => "docker_pull",
            StepKind::DockerRun => "docker_run",
            StepKind::DockerPool => "docker_pool",
            StepKind::DockerShell => "docker_shell",
            StepKind::FileExists => "file_exists",
            StepKind::DynamicLab => "dynamic_lab",
            StepKind::DynamicRubric => "dynamic_rubric",
            StepKind::RubricSet => "rubric_set",
            StepKind::RubricShell => "rubric_shell",
            StepKind::ModelTaskCheck => "model_task_check",
        }
    }

    pub fn from_discriminator(key: &str) -> Option<Self> {
        Self::DISPATCH_ORDER
            .into_iter()
            .find(|kind| kind.discriminator() == key)
    }
}

crate::simple_display! {
    StepKind {
        DockerBuild => "docker_build",
        DockerPull => "docker_pull",
        DockerRun => "docker_run",
        DockerPool => "docker_pool",
        DockerShell => "docker_shell",
        FileExists => "file_exists",
        DynamicLab => "dynamic_lab",
        DynamicRubric => "dynamic_rubric",
        RubricSet => "rubric_set",
        RubricShell => "rubric_shell",
        ModelTaskCheck => "model_task_check",
    }
}

/// A step row as read from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: StepId,
    pub task_id: TaskId,
    pub title: String,
    pub settings: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Value>,
}

/// Error returned when a step's settings document does not carry exactly
/// one known discriminator key (§3 invariant: "Discriminator integrity").
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiscriminatorError {
    #[error("step settings is not a JSON object")]
    NotAnObject,
    #[error("step settings has no recognised discriminator key")]
    Missing,
    #[error("step settings has {0} top-level keys, expected exactly one discriminator")]
    Multiple(usize),
}

impl Step {
    /// Returns the step's kind and its kind-specific configuration value,
    /// enforcing the "exactly one discriminator key" invariant (§3).
    // Allow expect here: the length check just above guarantees one entry exists.
    #[allow(clippy::expect_used)]
    pub fn discriminate(&self) -> Result<(StepKind, &Value), DiscriminatorError> {
        let obj = self.settings.as_object().ok_or(DiscriminatorError::NotAnObject)?;
        if obj.len() != 1 {
            if obj.is_empty() {
                return Err(DiscriminatorError::Missing);
            }
            return Err(DiscriminatorError::Multiple(obj.len()));
        }
        let (key, value) = obj.iter().next().expect("len checked above");
        let kind = StepKind::from_discriminator(key).ok_or(DiscriminatorError::Missing)?;
        Ok((kind, value))
    }

    /// Dependency ids declared as `depends_on: [{id: N}, ...]` inside the
    /// kind-specific configuration value.
    pub fn depends_on(config: &Value) -> Vec<StepId> {
        config
            .get("depends_on")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| entry.get("id").and_then(Value::as_i64))
                    .map(StepId::new)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The top-level `result` string of this step's results document, if any.
    pub fn result_status(&self) -> Option<&str> {
        self.results.as_ref()?.get("result")?.as_str()
    }

    pub fn succeeded(&self) -> bool {
        self.result_status() == Some("success")
    }
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
