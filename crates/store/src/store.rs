// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The relational store adapter (§4.3): typed operations over the
//! `tasks`/`steps` tables. Single connection behind a mutex — the
//! concurrency model (§5) has at most one orchestrator process touching
//! the database at a time, so there is nothing to pool.

use crate::schema::{open_connection, open_in_memory};
use crate::StoreError;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;
use std::sync::Mutex;
use sw_core::{Clock, Step, StepId, StepKind, SystemClock, Task, TaskId, TaskStatus};
use tracing::warn;

pub struct SqliteStore<C: Clock = SystemClock> {
    conn: Mutex<Connection>,
    clock: C,
}

impl SqliteStore<SystemClock> {
    pub fn open_default(path: &Path) -> Result<Self, StoreError> {
        Self::open(path, SystemClock)
    }
}

impl<C: Clock> SqliteStore<C> {
    pub fn open(path: &Path, clock: C) -> Result<Self, StoreError> {
        Ok(Self { conn: Mutex::new(open_connection(path)?), clock })
    }

    pub fn open_in_memory(clock: C) -> Result<Self, StoreError> {
        Ok(Self { conn: Mutex::new(open_in_memory()?), clock })
    }

    fn now(&self) -> String {
        self.clock.now().to_rfc3339()
    }

    /// §4.3 `select_pending`: when `step_id` is given, loads exactly that
    /// step if (and only if) it carries `kind`'s discriminator. Otherwise
    /// loads every step of an active task carrying the discriminator,
    /// ordered by step id.
    pub fn select_pending(&self, kind: StepKind, step_id: Option<StepId>) -> Result<Vec<Step>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        if let Some(id) = step_id {
            return Ok(read_step(&conn, id)?
                .filter(|step| step.discriminate().map(|(k, _)| k == kind).unwrap_or(false))
                .into_iter()
                .collect());
        }
        let mut stmt = conn.prepare(
            "SELECT s.id, s.task_id, s.title, s.settings, s.results \
             FROM steps s JOIN tasks t ON t.id = s.task_id \
             WHERE t.status = 'active' ORDER BY s.id",
        )?;
        let rows = stmt.query_map([], row_to_step)?;
        let mut out = Vec::new();
        for row in rows {
            let step = row?;
            match step.discriminate() {
                Ok((k, _)) if k == kind => out.push(step),
                _ => {}
            }
        }
        Ok(out)
    }

    /// Creates a task row. Tasks are created externally by the CLI (§3
    /// lifecycle); the engine itself never calls this.
    pub fn create_task(&self, name: &str, status: TaskStatus, local_path: Option<&str>, settings: &Value) -> Result<TaskId, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let now = self.now();
        conn.execute(
            "INSERT INTO tasks (name, status, local_path, settings, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            params![name, status.to_string(), local_path.unwrap_or(""), settings.to_string(), now],
        )?;
        Ok(TaskId::new(conn.last_insert_rowid()))
    }

    pub fn read_task(&self, task_id: TaskId) -> Result<Option<Task>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        read_task(&conn, task_id)
    }

    /// Reads a step by id regardless of its discriminator, for dependency
    /// resolution (§4.4) which must follow `depends_on` edges of any kind.
    pub fn get_step(&self, step_id: StepId) -> Result<Option<Step>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        read_step(&conn, step_id)
    }

    /// All steps owned by `task_id`, of any discriminator, ordered by id —
    /// used by handlers that locate a sibling step rather than walking a
    /// declared `depends_on` edge (e.g. `rubric_set`, §4.6).
    pub fn steps_for_task(&self, task_id: TaskId) -> Result<Vec<Step>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let mut stmt = conn.prepare("SELECT id, task_id, title, settings, results FROM steps WHERE task_id = ?1 ORDER BY id")?;
        let rows = stmt.query_map(params![task_id.get()], row_to_step)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn read_task_settings(&self, task_id: TaskId) -> Result<Value, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        read_task(&conn, task_id)?.map(|t| t.settings).ok_or(StoreError::TaskNotFound(task_id))
    }

    pub fn write_task_settings(&self, task_id: TaskId, settings: &Value) -> Result<(), StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let affected = conn.execute(
            "UPDATE tasks SET settings = ?1, updated_at = ?2 WHERE id = ?3",
            params![settings.to_string(), self.now(), task_id.get()],
        )?;
        if affected == 0 {
            return Err(StoreError::TaskNotFound(task_id));
        }
        Ok(())
    }

    pub fn update_step_settings(&self, step_id: StepId, settings: &Value) -> Result<(), StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let affected = conn.execute(
            "UPDATE steps SET settings = ?1, updated_at = ?2 WHERE id = ?3",
            params![settings.to_string(), self.now(), step_id.get()],
        )?;
        if affected == 0 {
            return Err(StoreError::StepNotFound(step_id));
        }
        Ok(())
    }

    pub fn update_step_results(&self, step_id: StepId, results: &Value) -> Result<(), StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let affected = conn.execute(
            "UPDATE steps SET results = ?1, updated_at = ?2 WHERE id = ?3",
            params![results.to_string(), self.now(), step_id.get()],
        )?;
        if affected == 0 {
            return Err(StoreError::StepNotFound(step_id));
        }
        Ok(())
    }

    pub fn create_step(&self, task_id: TaskId, title: &str, settings: &Value) -> Result<StepId, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let now = self.now();
        conn.execute(
            "INSERT INTO steps (task_id, title, settings, results, created_at, updated_at) \
             VALUES (?1, ?2, ?3, NULL, ?4, ?4)",
            params![task_id.get(), title, settings.to_string(), now],
        )?;
        Ok(StepId::new(conn.last_insert_rowid()))
    }

    pub fn delete_step(&self, step_id: StepId) -> Result<(), StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let affected = conn.execute("DELETE FROM steps WHERE id = ?1", params![step_id.get()])?;
        if affected == 0 {
            return Err(StoreError::StepNotFound(step_id));
        }
        Ok(())
    }

    pub fn update_step(&self, step_id: StepId, title: &str, settings: &Value) -> Result<(), StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let affected = conn.execute(
            "UPDATE steps SET title = ?1, settings = ?2, updated_at = ?3 WHERE id = ?4",
            params![title, settings.to_string(), self.now(), step_id.get()],
        )?;
        if affected == 0 {
            return Err(StoreError::StepNotFound(step_id));
        }
        Ok(())
    }

    /// §4.3 `get_generated_steps`: all steps whose kind-specific
    /// configuration carries `generated_by = producer_id`.
    pub fn get_generated_steps(&self, producer_id: StepId) -> Result<Vec<Step>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let mut stmt = conn.prepare("SELECT id, task_id, title, settings, results FROM steps ORDER BY id")?;
        let rows = stmt.query_map([], row_to_step)?;
        let mut out = Vec::new();
        for row in rows {
            let step = row?;
            let Ok((_, config)) = step.discriminate() else { continue };
            let matches = config.get("generated_by").and_then(Value::as_i64) == Some(producer_id.get());
            if matches {
                out.push(step);
            }
        }
        Ok(out)
    }

    /// §4.3 `copy_step`: inside one transaction, asserts the destination
    /// task exists, then inserts a copy of `from_id`'s title and settings.
    pub fn copy_step(&self, from_id: StepId, to_task_id: TaskId) -> Result<StepId, StoreError> {
        let mut conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let tx = conn.transaction()?;
        let exists: Option<i64> =
            tx.query_row("SELECT 1 FROM tasks WHERE id = ?1", params![to_task_id.get()], |r| r.get(0)).optional()?;
        if exists.is_none() {
            return Err(StoreError::TaskNotFound(to_task_id));
        }
        let (title, settings): (String, String) = tx
            .query_row("SELECT title, settings FROM steps WHERE id = ?1", params![from_id.get()], |r| {
                Ok((r.get(0)?, r.get(1)?))
            })
            .optional()?
            .ok_or(StoreError::StepNotFound(from_id))?;
        let now = self.clock.now().to_rfc3339();
        tx.execute(
            "INSERT INTO steps (task_id, title, settings, results, created_at, updated_at) \
             VALUES (?1, ?2, ?3, NULL, ?4, ?4)",
            params![to_task_id.get(), title, settings, now],
        )?;
        let new_id = StepId::new(tx.last_insert_rowid());
        tx.commit()?;
        Ok(new_id)
    }

    /// Applies a dotted-path edit to a step's settings inside a single
    /// transaction, failing if the step row does not exist.
    pub fn edit_step_field(&self, step_id: StepId, dotted_path: &str, value: Value) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let tx = conn.transaction()?;
        let current: Option<String> =
            tx.query_row("SELECT settings FROM steps WHERE id = ?1", params![step_id.get()], |r| r.get(0)).optional()?;
        let current = current.ok_or(StoreError::StepNotFound(step_id))?;
        let current: Value = serde_json::from_str(&current).map_err(|e| StoreError::MalformedSettings(step_id, e))?;
        let updated = crate::edit::edit_field(&current, dotted_path, value)?;
        let affected = tx.execute(
            "UPDATE steps SET settings = ?1, updated_at = ?2 WHERE id = ?3",
            params![updated.to_string(), self.clock.now().to_rfc3339(), step_id.get()],
        )?;
        if affected == 0 {
            return Err(StoreError::StepNotFound(step_id));
        }
        tx.commit()?;
        Ok(())
    }
}

fn read_task(conn: &Connection, task_id: TaskId) -> Result<Option<Task>, StoreError> {
    conn.query_row(
        "SELECT id, name, status, local_path, settings FROM tasks WHERE id = ?1",
        params![task_id.get()],
        row_to_task,
    )
    .optional()
    .map_err(StoreError::from)
}

fn read_step(conn: &Connection, step_id: StepId) -> Result<Option<Step>, StoreError> {
    conn.query_row(
        "SELECT id, task_id, title, settings, results FROM steps WHERE id = ?1",
        params![step_id.get()],
        row_to_step,
    )
    .optional()
    .map_err(StoreError::from)
}

fn row_to_task(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
    let id: i64 = row.get(0)?;
    let name: String = row.get(1)?;
    let status: String = row.get(2)?;
    let local_path: Option<String> = row.get(3)?;
    let settings: String = row.get(4)?;
    Ok(Task {
        id: TaskId::new(id),
        name,
        status: parse_status(&status),
        local_path: local_path.filter(|p| !p.is_empty()).map(Into::into),
        settings: serde_json::from_str(&settings).unwrap_or(Value::Object(Default::default())),
    })
}

fn row_to_step(row: &rusqlite::Row<'_>) -> rusqlite::Result<Step> {
    let id: i64 = row.get(0)?;
    let task_id: i64 = row.get(1)?;
    let title: String = row.get(2)?;
    let settings: String = row.get(3)?;
    let results: Option<String> = row.get(4)?;
    Ok(Step {
        id: StepId::new(id),
        task_id: TaskId::new(task_id),
        title,
        settings: serde_json::from_str(&settings).unwrap_or(Value::Object(Default::default())),
        results: results.and_then(|r| serde_json::from_str(&r).ok()),
    })
}

fn parse_status(raw: &str) -> TaskStatus {
    match raw {
        "active" => TaskStatus::Active,
        "inactive" => TaskStatus::Inactive,
        "disabled" => TaskStatus::Disabled,
        "running" => TaskStatus::Running,
        other => {
            warn!(status = other, "unrecognised task status, defaulting to inactive");
            TaskStatus::Inactive
        }
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
