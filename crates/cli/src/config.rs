// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Orchestrator configuration (§10.4): the database path, container
//! engine binary name, and task base-path root, loaded from a TOML file.

use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct OrchestratorConfig {
    /// Path to the SQLite database file (§4.3).
    pub database_path: PathBuf,
    /// Container engine binary invoked by `ProcessRuntime` (§4.2), e.g. `docker`.
    #[serde(default = "default_engine")]
    pub container_engine: String,
}

fn default_engine() -> String {
    "docker".to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading config file {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("parsing config file {0}: {1}")]
    Parse(PathBuf, toml::de::Error),
}

impl OrchestratorConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|err| ConfigError::Read(path.to_path_buf(), err))?;
        toml::from_str(&text).map_err(|err| ConfigError::Parse(path.to_path_buf(), err))
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
