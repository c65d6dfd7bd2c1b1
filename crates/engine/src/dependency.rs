// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dependency resolver (§4.4): readiness and inherited image identity.

use std::collections::HashSet;
use serde_json::Value;
use sw_core::{Clock, Step, StepId, StepKind};
use sw_store::SqliteStore;
use tracing::warn;

/// A step is ready when every declared dependency has recorded a
/// successful result. Missing rows, missing results, and non-success
/// results all count as "not ready", never as an error.
pub fn ready<C: Clock>(step: &Step, store: &SqliteStore<C>) -> bool {
    let Ok((_, config)) = step.discriminate() else { return false };
    Step::depends_on(config).iter().all(|dep_id| matches!(store.get_step(*dep_id), Ok(Some(dep)) if dep.succeeded()))
}

/// `(image_id, image_tag)` as recorded in a `docker_build`/`docker_run`/
/// `docker_shell` configuration, wherever that kind stores it.
///
/// A `docker_build` step may declare its own `image_tag`/`image_id` as an
/// override, but the common case leaves both unset and defers to the
/// owning task's settings (§4.6 task-level authority) — `task` supplies
/// that fallback.
fn image_identity_of(kind: StepKind, config: &Value, task: &sw_core::Task) -> (Option<String>, Option<String>) {
    let doc = match kind {
        StepKind::DockerBuild => config,
        StepKind::DockerRun | StepKind::DockerShell => config.get("docker").unwrap_or(&Value::Null),
        _ => return (None, None),
    };
    let text = |key: &str| doc.get(key).and_then(Value::as_str).map(str::to_string).filter(|s| !s.is_empty());
    let (image_id, image_tag) = (text("image_id"), text("image_tag"));
    if kind == StepKind::DockerBuild && (image_id.is_none() || image_tag.is_none()) {
        let task_tag = Some(task.image_tag()).filter(|s| !s.is_empty());
        return (image_id.or_else(|| task.image_id()), image_tag.or(task_tag));
    }
    (image_id, image_tag)
}

/// DFS over `depends_on` chains starting at `step`'s own dependencies,
/// through `docker_build`/`docker_run`/`docker_shell` configurations.
/// Returns the first `(image_id, image_tag)` pair found with both fields
/// non-empty, or `(None, None)` if the walk exhausts every branch.
///
/// Cycles are detected with a visited set cloned by value into each
/// recursive branch, so sibling branches that legitimately revisit the
/// same upstream node (a diamond-shaped DAG) don't spuriously abort one
/// another; only an actual repeat along one branch's own path aborts that
/// branch and logs, while the walk continues along any remaining
/// branches (§8 "Acyclic traversal safety").
pub fn inherit_image_identity<C: Clock>(step: &Step, store: &SqliteStore<C>) -> (Option<String>, Option<String>) {
    let mut visited = HashSet::new();
    visited.insert(step.id);
    let Ok((_, config)) = step.discriminate() else { return (None, None) };
    for dep_id in Step::depends_on(config) {
        if let Some(found) = walk(dep_id, store, visited.clone()) {
            return (Some(found.0), Some(found.1));
        }
    }
    (None, None)
}

fn walk<C: Clock>(step_id: StepId, store: &SqliteStore<C>, mut visited: HashSet<StepId>) -> Option<(String, String)> {
    if !visited.insert(step_id) {
        warn!(%step_id, "cycle detected while inheriting image identity; aborting this branch");
        return None;
    }
    let dep_step = store.get_step(step_id).ok().flatten()?;
    let task = store.read_task(dep_step.task_id).ok().flatten()?;
    let (kind, config) = dep_step.discriminate().ok()?;
    let (image_id, image_tag) = image_identity_of(kind, config, &task);
    if let (Some(id), Some(tag)) = (image_id, image_tag) {
        return Some((id, tag));
    }
    for next in Step::depends_on(config) {
        if let Some(found) = walk(next, store, visited.clone()) {
            return Some(found);
        }
    }
    None
}

#[cfg(test)]
#[path = "dependency_tests.rs"]
mod tests;
