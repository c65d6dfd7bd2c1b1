// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

#[test]
fn missing_config_file_exits_with_code_one() {
    let cli = Cli { config: PathBuf::from("/no/such/orchestrator.toml"), command: Command::Tick };

    let err = run(cli).unwrap_err();

    assert_eq!(err.code, 1);
}

#[test]
fn tick_against_an_empty_store_succeeds() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("orchestrator.toml");
    let db_path = dir.path().join("state.db");
    std::fs::write(&config_path, format!("database_path = \"{}\"\n", db_path.display())).unwrap();
    let cli = Cli { config: config_path, command: Command::Tick };

    run(cli).unwrap();
}
