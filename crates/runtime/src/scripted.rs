// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A scripted [`ContainerRuntime`] double for tests: canned responses keyed
//! by tag/container id, with a call log for assertions.

use crate::{CommandOutcome, ContainerRuntime, RuntimeError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// One recorded invocation, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedCall {
    Build { params: Vec<String>, image_tag: String, context_dir: PathBuf, platform: Option<String> },
    InspectImageId(String),
    Pull(String),
    ListContainersByAncestor(String),
    InspectContainerImage(String),
    Exec { container_id: String, command: String },
}

/// Canned [`ContainerRuntime`] for unit tests. Every lookup table defaults
/// empty; an un-scripted lookup fails with [`RuntimeError::NonZeroExit`]
/// rather than panicking, so a test that forgot to script a call sees a
/// regular handler failure instead of an abort.
#[derive(Debug, Default)]
pub struct ScriptedRuntime {
    pub build_fails: bool,
    pub image_ids: HashMap<String, String>,
    pub containers_by_ancestor: HashMap<String, Vec<String>>,
    pub container_images: HashMap<String, String>,
    pub exec_outcomes: HashMap<(String, String), CommandOutcome>,
    pub calls: Mutex<Vec<ScriptedCall>>,
}

impl ScriptedRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image_id(mut self, tag: impl Into<String>, digest: impl Into<String>) -> Self {
        self.image_ids.insert(tag.into(), digest.into());
        self
    }

    pub fn with_containers(mut self, tag: impl Into<String>, ids: Vec<String>) -> Self {
        self.containers_by_ancestor.insert(tag.into(), ids);
        self
    }

    pub fn with_container_image(mut self, container_id: impl Into<String>, digest: impl Into<String>) -> Self {
        self.container_images.insert(container_id.into(), digest.into());
        self
    }

    pub fn with_exec(mut self, container_id: impl Into<String>, command: impl Into<String>, outcome: CommandOutcome) -> Self {
        self.exec_outcomes.insert((container_id.into(), command.into()), outcome);
        self
    }

    pub fn calls(&self) -> Vec<ScriptedCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn record(&self, call: ScriptedCall) {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).push(call);
    }

    fn not_scripted(command: &str, key: &str) -> RuntimeError {
        RuntimeError::NonZeroExit {
            command: command.to_string(),
            code: -1,
            stderr: format!("no scripted response for {key:?}"),
        }
    }
}

impl ContainerRuntime for ScriptedRuntime {
    fn build(&self, params: &[String], image_tag: &str, context_dir: &Path, platform: Option<&str>) -> Result<(), RuntimeError> {
        self.record(ScriptedCall::Build {
            params: params.to_vec(),
            image_tag: image_tag.to_string(),
            context_dir: context_dir.to_path_buf(),
            platform: platform.map(str::to_string),
        });
        if self.build_fails {
            return Err(RuntimeError::NonZeroExit { command: "build".to_string(), code: 1, stderr: "scripted failure".to_string() });
        }
        Ok(())
    }

    fn inspect_image_id(&self, tag: &str) -> Result<String, RuntimeError> {
        self.record(ScriptedCall::InspectImageId(tag.to_string()));
        self.image_ids.get(tag).cloned().ok_or_else(|| Self::not_scripted("inspect image id", tag))
    }

    fn pull(&self, tag: &str) -> Result<(), RuntimeError> {
        self.record(ScriptedCall::Pull(tag.to_string()));
        Ok(())
    }

    fn list_containers_by_ancestor(&self, tag: &str) -> Result<Vec<String>, RuntimeError> {
        self.record(ScriptedCall::ListContainersByAncestor(tag.to_string()));
        Ok(self.containers_by_ancestor.get(tag).cloned().unwrap_or_default())
    }

    fn inspect_container_image(&self, container_id: &str) -> Result<String, RuntimeError> {
        self.record(ScriptedCall::InspectContainerImage(container_id.to_string()));
        self.container_images
            .get(container_id)
            .cloned()
            .ok_or_else(|| Self::not_scripted("inspect container image", container_id))
    }

    fn exec_in_container(&self, container_id: &str, command: &str) -> Result<CommandOutcome, RuntimeError> {
        self.record(ScriptedCall::Exec { container_id: container_id.to_string(), command: command.to_string() });
        Ok(self
            .exec_outcomes
            .get(&(container_id.to_string(), command.to_string()))
            .cloned()
            .unwrap_or(CommandOutcome { success: true, stdout: String::new(), stderr: String::new() }))
    }
}

#[cfg(test)]
#[path = "scripted_tests.rs"]
mod tests;
