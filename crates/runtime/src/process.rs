// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The real [`ContainerRuntime`], spawning the configured engine binary.

use crate::{CommandOutcome, ContainerRuntime, RuntimeError};
use std::io::{Read, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Invokes an external container CLI (`docker`, `podman`, …) via
/// `std::process::Command`.
#[derive(Debug, Clone)]
pub struct ProcessRuntime {
    engine: String,
}

impl ProcessRuntime {
    pub fn new(engine: impl Into<String>) -> Self {
        Self { engine: engine.into() }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.engine);
        cmd.args(args);
        debug!(engine = %self.engine, args = ?args, "spawning container runtime command");
        cmd
    }

    fn run_capturing(&self, label: &str, cmd: Command) -> Result<String, RuntimeError> {
        let teed = run_teed(label, cmd)?;
        if !teed.success {
            return Err(RuntimeError::NonZeroExit { command: label.to_string(), code: teed.code, stderr: teed.stderr.trim().to_string() });
        }
        Ok(teed.stdout.trim().to_string())
    }
}

struct TeedOutput {
    success: bool,
    code: i32,
    stdout: String,
    stderr: String,
}

/// Spawns `cmd` with piped stdout/stderr, tee-ing each stream to the
/// process's own stdout/stderr as it arrives while also buffering it for
/// the caller (§4.2). Does not interpret the exit status; callers decide
/// whether a non-zero exit is an error (`run_capturing`) or a captured
/// outcome (`exec_in_container`).
// Allow expect here: both streams were just set to piped above, and the
// tee threads never panic (`tee` swallows its own read/write errors).
#[allow(clippy::expect_used)]
fn run_teed(label: &str, mut cmd: Command) -> Result<TeedOutput, RuntimeError> {
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|source| RuntimeError::Spawn { command: label.to_string(), source })?;
    let child_stdout = child.stdout.take().expect("stdout was piped");
    let child_stderr = child.stderr.take().expect("stderr was piped");

    let stdout_thread = std::thread::spawn(move || tee(child_stdout, std::io::stdout()));
    let stderr_thread = std::thread::spawn(move || tee(child_stderr, std::io::stderr()));

    let stdout = stdout_thread.join().expect("stdout tee thread panicked");
    let stderr = stderr_thread.join().expect("stderr tee thread panicked");

    let status = child.wait().map_err(|source| RuntimeError::Spawn { command: label.to_string(), source })?;
    Ok(TeedOutput { success: status.success(), code: status.code().unwrap_or(-1), stdout, stderr })
}

/// Copies `src` byte-for-byte into both `dest` (the process's own
/// stdout/stderr) and a returned buffer, one read at a time.
fn tee(mut src: impl Read, mut dest: impl Write) -> String {
    let mut buf = [0u8; 4096];
    let mut captured = Vec::new();
    loop {
        let n = match src.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(_) => break,
        };
        let _ = dest.write_all(&buf[..n]);
        captured.extend_from_slice(&buf[..n]);
    }
    let _ = dest.flush();
    String::from_utf8_lossy(&captured).into_owned()
}

/// Substitutes `%%IMAGETAG%%`, splits each param on whitespace, re-inserts
/// `--platform <platform>` when given, and appends `context_dir` (§4.2, §4.6).
pub fn build_args(params: &[String], image_tag: &str, context_dir: &Path, platform: Option<&str>) -> Vec<String> {
    let mut args: Vec<String> = vec!["build".to_string()];
    for param in params {
        let substituted = param.replace("%%IMAGETAG%%", image_tag);
        args.extend(substituted.split_whitespace().map(str::to_string));
    }
    if let Some(platform) = platform {
        args.push("--platform".to_string());
        args.push(platform.to_string());
    }
    args.push(context_dir.display().to_string());
    args
}

impl ContainerRuntime for ProcessRuntime {
    fn build(&self, params: &[String], image_tag: &str, context_dir: &Path, platform: Option<&str>) -> Result<(), RuntimeError> {
        let args = build_args(params, image_tag, context_dir, platform);
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run_capturing("build", self.command(&arg_refs)).map(|_| ())
    }

    fn inspect_image_id(&self, tag: &str) -> Result<String, RuntimeError> {
        match self.run_capturing("inspect -f {{.Id}}", self.command(&["inspect", "-f", "{{.Id}}", tag])) {
            Ok(digest) => Ok(digest),
            Err(err) if !tag.contains(':') => {
                let with_latest = format!("{tag}:latest");
                self.run_capturing(
                    "inspect -f {{.Id}}",
                    self.command(&["inspect", "-f", "{{.Id}}", &with_latest]),
                )
                .map_err(|_| err)
            }
            Err(err) => Err(err),
        }
    }

    fn pull(&self, tag: &str) -> Result<(), RuntimeError> {
        self.run_capturing("pull", self.command(&["pull", tag])).map(|_| ())
    }

    fn list_containers_by_ancestor(&self, tag: &str) -> Result<Vec<String>, RuntimeError> {
        let filter = format!("ancestor={tag}");
        let out = self.run_capturing(
            "ps --filter ancestor",
            self.command(&["ps", "--filter", &filter, "--format", "{{.ID}}"]),
        )?;
        Ok(out.lines().map(str::to_string).filter(|l| !l.is_empty()).collect())
    }

    fn inspect_container_image(&self, container_id: &str) -> Result<String, RuntimeError> {
        self.run_capturing(
            "inspect -f {{.Image}}",
            self.command(&["inspect", "-f", "{{.Image}}", container_id]),
        )
    }

    fn exec_in_container(&self, container_id: &str, command: &str) -> Result<CommandOutcome, RuntimeError> {
        let cmd = self.command(&["exec", container_id, "sh", "-c", command]);
        let teed = run_teed("exec", cmd)?;
        Ok(CommandOutcome { success: teed.success, stdout: teed.stdout, stderr: teed.stderr })
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
