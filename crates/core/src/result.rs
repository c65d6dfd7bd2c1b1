// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Step result documents (§6.4).

use serde::{Deserialize, Serialize};

/// Outcome discriminator for a step's results document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Failure,
    Error,
}

crate::simple_display! {
    Outcome {
        Success => "success",
        Failure => "failure",
        Error => "error",
    }
}

/// One labelled command's captured output, as recorded by `docker_shell`
/// and `rubric_shell` (§4.6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOutput {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandOutput {
    pub fn ok(label: impl Into<String>, output: impl Into<String>) -> Self {
        CommandOutput { label: label.into(), output: Some(output.into()), error: None }
    }

    pub fn failed(label: impl Into<String>, error: impl Into<String>) -> Self {
        CommandOutput { label: label.into(), output: None, error: Some(error.into()) }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// The wholesale-overwritten results document a handler writes after each
/// execution (§3, §6.4): `{result, message?, outputs?, image_id?,
/// container_id?, info?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StepResult {
    pub result: Option<Outcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Vec<CommandOutput>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
}

impl StepResult {
    pub fn success() -> Self {
        StepResult { result: Some(Outcome::Success), ..Default::default() }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        StepResult { result: Some(Outcome::Failure), message: Some(message.into()), ..Default::default() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        StepResult { result: Some(Outcome::Error), message: Some(message.into()), ..Default::default() }
    }

    pub fn with_outputs(mut self, outputs: Vec<CommandOutput>) -> Self {
        let failed = outputs.iter().any(CommandOutput::is_failure);
        self.outputs = Some(outputs);
        if failed {
            self.result = Some(Outcome::Failure);
        }
        self
    }

    pub fn with_image_id(mut self, image_id: impl Into<String>) -> Self {
        self.image_id = Some(image_id.into());
        self
    }

    pub fn with_container_id(mut self, container_id: impl Into<String>) -> Self {
        self.container_id = Some(container_id.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.result == Some(Outcome::Success)
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
