// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connection setup and schema (§6.1).

use crate::StoreError;
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

const SCHEMA_VERSION: i64 = 1;

pub fn open_connection(path: &Path) -> Result<Connection, StoreError> {
    let mut conn = Connection::open(path)?;
    apply_pragmas(&conn)?;
    initialize_schema(&mut conn)?;
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection, StoreError> {
    let mut conn = Connection::open_in_memory()?;
    apply_pragmas(&conn)?;
    initialize_schema(&mut conn)?;
    Ok(conn)
}

fn apply_pragmas(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA journal_mode = WAL;")?;
    conn.busy_timeout(Duration::from_millis(5_000))?;
    Ok(())
}

fn initialize_schema(conn: &mut Connection) -> Result<(), StoreError> {
    let tx = conn.transaction()?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")?;
    let version: Option<i64> =
        tx.query_row("SELECT version FROM store_meta LIMIT 1", [], |row| row.get(0)).ok();
    if version.is_none() {
        tx.execute("INSERT INTO store_meta (version) VALUES (?1)", [SCHEMA_VERSION])?;
        tx.execute_batch(
            "CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                status TEXT NOT NULL,
                local_path TEXT,
                settings TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS steps (
                id INTEGER PRIMARY KEY,
                task_id INTEGER NOT NULL REFERENCES tasks(id),
                title TEXT NOT NULL,
                settings TEXT NOT NULL,
                results TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_steps_task_id ON steps (task_id);",
        )?;
    }
    tx.commit()?;
    Ok(())
}
