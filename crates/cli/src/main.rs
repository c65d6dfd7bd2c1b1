// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The orchestrator CLI: a thin `clap` binary wrapping one tick of the
//! engine (§10.1). Flag parsing beyond a config path and the `tick`
//! subcommand is out of scope.

mod config;
mod exit_error;

use clap::{Parser, Subcommand};
use config::OrchestratorConfig;
use exit_error::ExitError;
use std::path::PathBuf;
use std::process::ExitCode;
use sw_core::SystemClock;
use sw_engine::Engine;
use sw_runtime::ProcessRuntime;
use sw_store::SqliteStore;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sw", about = "Task-step orchestrator")]
struct Cli {
    /// Path to the TOML orchestrator config (§10.4).
    #[arg(long, default_value = "orchestrator.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one tick of the dispatcher (§4.7) and exit.
    Tick,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "sw exited with an error");
            eprintln!("error: {err}");
            ExitCode::from(err.code as u8)
        }
    }
}

fn run(cli: Cli) -> Result<(), ExitError> {
    let config = OrchestratorConfig::load(&cli.config)
        .map_err(|err| ExitError::new(1, format!("loading config: {err}")))?;

    match cli.command {
        Command::Tick => tick(&config),
    }
}

fn tick(config: &OrchestratorConfig) -> Result<(), ExitError> {
    let store = SqliteStore::open_default(&config.database_path)
        .map_err(|err| ExitError::new(2, format!("opening store: {err}")))?;
    let runtime = ProcessRuntime::new(config.container_engine.clone());
    let engine = Engine::new(store, runtime, SystemClock);

    engine.tick().map_err(|err| ExitError::new(3, format!("tick failed: {err}")))
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
