// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed durable store for tasks, lists and sync state.
//!
//! Collections are replaced wholesale inside a transaction, so a crash
//! mid-write leaves the previous set intact.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::Duration;

use crate::due::{format_due, parse_due};
use crate::error::{Error, Result};
use crate::field::PendingChanges;
use crate::list::List;
use crate::store::Store;
use crate::task::{Task, TaskKey};

/// SQL schema for the local store.
pub const SCHEMA: &str = r#"
-- Tasks, in display order, with their pending local changes
CREATE TABLE IF NOT EXISTS tasks (
    list_id TEXT NOT NULL,
    taskseries_id TEXT NOT NULL,
    task_id TEXT NOT NULL,
    ordinal INTEGER NOT NULL,
    name TEXT NOT NULL,
    due TEXT NOT NULL DEFAULT '',
    modified TEXT,
    completed INTEGER NOT NULL DEFAULT 0,
    deleted INTEGER NOT NULL DEFAULT 0,
    local_changes TEXT NOT NULL DEFAULT '[]',
    PRIMARY KEY (list_id, taskseries_id, task_id)
);

-- Lists as last pulled
CREATE TABLE IF NOT EXISTS lists (
    list_id TEXT PRIMARY KEY,
    ordinal INTEGER NOT NULL,
    name TEXT NOT NULL,
    deleted INTEGER NOT NULL DEFAULT 0,
    locked INTEGER NOT NULL DEFAULT 0,
    archived INTEGER NOT NULL DEFAULT 0,
    position INTEGER,
    smart INTEGER NOT NULL DEFAULT 0,
    filter TEXT NOT NULL DEFAULT ''
);

-- Key/value sync bookkeeping (watermark)
CREATE TABLE IF NOT EXISTS sync_state (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_tasks_ordinal ON tasks(ordinal);
CREATE INDEX IF NOT EXISTS idx_lists_ordinal ON lists(ordinal);
"#;

const LATEST_MODIFIED_KEY: &str = "latest_modified";

/// How long a writer waits for another process to release the store.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Convert a core error into a rusqlite conversion failure for row mapping.
fn conversion_error(err: Error) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(err))
}

/// Parse an RFC3339 timestamp from the database.
fn parse_timestamp(value: &str, column: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc)).map_err(|_| {
        Error::CorruptedData(format!("invalid timestamp '{value}' in column '{column}'"))
    })
}

/// SQLite database handle.
pub struct Database {
    pub conn: Connection,
}

impl Database {
    /// Opens (creating if needed) the store at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let db = Database { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Opens a throwaway in-memory store.
    pub fn open_in_memory() -> Result<Self> {
        let db = Database { conn: Connection::open_in_memory()? };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    fn map_task(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
        let due: String = row.get("due")?;
        let modified: Option<String> = row.get("modified")?;
        let local_changes: String = row.get("local_changes")?;

        let due = parse_due(&due).map_err(conversion_error)?;
        let modified = modified
            .map(|m| parse_timestamp(&m, "modified"))
            .transpose()
            .map_err(conversion_error)?;
        let local_changes: PendingChanges = serde_json::from_str(&local_changes)
            .map_err(|e| conversion_error(Error::CorruptedData(format!("local_changes: {e}"))))?;

        let mut task = Task::new(
            TaskKey::new(
                row.get::<_, String>("list_id")?,
                row.get::<_, String>("taskseries_id")?,
                row.get::<_, String>("task_id")?,
            ),
            row.get::<_, String>("name")?,
        )
        .with_due(due)
        .with_modified(modified);
        task.completed = row.get("completed")?;
        task.deleted = row.get("deleted")?;
        task.local_changes = local_changes;
        Ok(task)
    }

    fn map_list(row: &rusqlite::Row<'_>) -> rusqlite::Result<List> {
        Ok(List {
            list_id: row.get("list_id")?,
            name: row.get("name")?,
            deleted: row.get("deleted")?,
            locked: row.get("locked")?,
            archived: row.get("archived")?,
            position: row.get("position")?,
            smart: row.get("smart")?,
            filter: row.get("filter")?,
        })
    }
}

/// Replaces every task row. The caller owns the transaction.
fn write_tasks(conn: &Connection, tasks: &[Task]) -> Result<()> {
    conn.execute("DELETE FROM tasks", [])?;
    let mut stmt = conn.prepare(
        "INSERT OR REPLACE INTO tasks
         (list_id, taskseries_id, task_id, ordinal, name, due, modified, completed,
          deleted, local_changes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    )?;
    for (ordinal, task) in tasks.iter().enumerate() {
        stmt.execute(params![
            task.key.list_id,
            task.key.taskseries_id,
            task.key.task_id,
            ordinal as i64,
            task.name,
            format_due(task.due),
            task.modified.map(|m| m.to_rfc3339()),
            task.completed,
            task.deleted,
            serde_json::to_string(&task.local_changes)?,
        ])?;
    }
    Ok(())
}

impl Store for Database {
    fn load_all_tasks(&self) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(
            "SELECT list_id, taskseries_id, task_id, name, due, modified, completed, deleted,
                    local_changes
             FROM tasks ORDER BY ordinal",
        )?;
        let tasks = stmt.query_map([], Self::map_task)?.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tasks)
    }

    fn replace_all_tasks(&self, tasks: &[Task]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        write_tasks(&tx, tasks)?;
        tx.commit()?;
        tracing::debug!(count = tasks.len(), "replaced stored tasks");
        Ok(())
    }

    fn update_tasks(&self, f: &mut dyn FnMut(Vec<Task>) -> Result<Vec<Task>>) -> Result<()> {
        // IMMEDIATE takes the write lock up front, so a concurrent writer
        // waits for the whole read-modify-write.
        self.conn.execute_batch("BEGIN IMMEDIATE")?;
        let result = self.load_all_tasks().and_then(|stored| f(stored)).and_then(|tasks| {
            write_tasks(&self.conn, &tasks)?;
            Ok(tasks.len())
        });
        match result {
            Ok(count) => {
                self.conn.execute_batch("COMMIT")?;
                tracing::debug!(count, "updated stored tasks");
                Ok(())
            }
            Err(e) => {
                if let Err(rollback) = self.conn.execute_batch("ROLLBACK") {
                    tracing::warn!(error = %rollback, "rollback failed");
                }
                Err(e)
            }
        }
    }

    fn load_all_lists(&self) -> Result<Vec<List>> {
        let mut stmt = self.conn.prepare(
            "SELECT list_id, name, deleted, locked, archived, position, smart, filter
             FROM lists ORDER BY ordinal",
        )?;
        let lists = stmt.query_map([], Self::map_list)?.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(lists)
    }

    fn replace_all_lists(&self, lists: &[List]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM lists", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO lists
                 (list_id, ordinal, name, deleted, locked, archived, position, smart, filter)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for (ordinal, list) in lists.iter().enumerate() {
                stmt.execute(params![
                    list.list_id,
                    ordinal as i64,
                    list.name,
                    list.deleted,
                    list.locked,
                    list.archived,
                    list.position,
                    list.smart,
                    list.filter,
                ])?;
            }
        }
        tx.commit()?;
        tracing::debug!(count = lists.len(), "replaced stored lists");
        Ok(())
    }

    fn latest_modified(&self) -> Result<Option<DateTime<Utc>>> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM sync_state WHERE key = ?1",
                [LATEST_MODIFIED_KEY],
                |row| row.get(0),
            )
            .optional()?;
        value.map(|v| parse_timestamp(&v, LATEST_MODIFIED_KEY)).transpose()
    }

    fn set_latest_modified(&self, at: DateTime<Utc>) -> Result<()> {
        self.conn.execute(
            "INSERT INTO sync_state (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![LATEST_MODIFIED_KEY, at.to_rfc3339()],
        )?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "db_tests.rs"]
mod tests;
