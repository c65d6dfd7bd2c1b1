// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The container runtime adapter (§4.2 "Runtime adapter", §6.2): wraps
//! invocations of the container CLI and turns exit codes and captured
//! streams into structured outcomes.

mod process;
mod scripted;

pub use process::ProcessRuntime;
pub use scripted::{ScriptedCall, ScriptedRuntime};

/// Captured outcome of `exec_in_container`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("spawning `{command}`: {source}")]
    Spawn { command: String, #[source] source: std::io::Error },

    #[error("`{command}` exited {code}: {stderr}")]
    NonZeroExit { command: String, code: i32, stderr: String },

    #[error("could not parse `{command}` output: {reason}")]
    Parse { command: String, reason: String },
}

/// Everything the engine does to an external container runtime, reached
/// only through the CLI contract in §6.2. A real implementation
/// ([`ProcessRuntime`]) spawns the configured engine binary; tests swap in
/// [`ScriptedRuntime`].
pub trait ContainerRuntime {
    /// `<engine> build <args…> <context_dir>`.
    ///
    /// Each entry of `params` has the literal token `%%IMAGETAG%%` replaced
    /// with `image_tag`, then is split on whitespace into individual
    /// arguments before `context_dir` is appended. When `platform` is
    /// `Some`, `--platform <value>` is re-inserted right before
    /// `context_dir`, re-applying the task's authoritative platform after
    /// any recorded `--platform` token was stripped from `params` (§4.6).
    fn build(&self, params: &[String], image_tag: &str, context_dir: &std::path::Path, platform: Option<&str>) -> Result<(), RuntimeError>;

    /// `<engine> inspect -f {{.Id}} <tag>`; if `tag` has no colon and the
    /// lookup fails, retries once with `:latest` appended (§4.2).
    fn inspect_image_id(&self, tag: &str) -> Result<String, RuntimeError>;

    /// `<engine> pull <tag>`.
    fn pull(&self, tag: &str) -> Result<(), RuntimeError>;

    /// `<engine> ps --filter ancestor=<tag> --format {{.ID}}`.
    fn list_containers_by_ancestor(&self, tag: &str) -> Result<Vec<String>, RuntimeError>;

    /// `<engine> inspect -f {{.Image}} <container_id>`.
    fn inspect_container_image(&self, container_id: &str) -> Result<String, RuntimeError>;

    /// `<engine> exec <container_id> sh -c <command>`.
    fn exec_in_container(&self, container_id: &str, command: &str) -> Result<CommandOutcome, RuntimeError>;
}

/// Strips a leading `sha256:` prefix and surrounding whitespace, the
/// normalisation `docker_shell` applies before comparing digests (§4.6).
pub fn normalize_digest(digest: &str) -> &str {
    digest.trim().strip_prefix("sha256:").unwrap_or(digest.trim())
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
