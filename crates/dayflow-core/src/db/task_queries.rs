//! Task CRUD operations and queries.

use jiff::Timestamp;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde_json::json;

use super::{invalid_value, parse_timestamp};
use crate::{
    error::{DatabaseResultExt, Result},
    models::{ClockTime, Priority, Task},
    params::AddTask,
    sync::{SyncEntity, SyncOperation},
};

const INSERT_TASK_SQL: &str = "INSERT INTO tasks (title, duration, priority, deadline, fixed_time, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";
const TASK_COLUMNS: &str = "id, title, duration, priority, deadline, fixed_time, created_at";
const DELETE_TASK_SQL: &str = "DELETE FROM tasks WHERE id = ?1";
const DELETE_ALL_TASKS_SQL: &str = "DELETE FROM tasks";

fn parse_clock(column: usize, raw: Option<String>) -> rusqlite::Result<Option<ClockTime>> {
    raw.map(|value| {
        value
            .parse::<ClockTime>()
            .map_err(|e| invalid_value(column, e.to_string()))
    })
    .transpose()
}

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    let priority: String = row.get(3)?;
    Ok(Task {
        id: row.get::<_, i64>(0)? as u64,
        title: row.get(1)?,
        duration: row.get(2)?,
        priority: priority
            .parse::<Priority>()
            .map_err(|e| invalid_value(3, e))?,
        deadline: parse_clock(4, row.get(4)?)?,
        fixed_time: parse_clock(5, row.get(5)?)?,
        created_at: parse_timestamp(6, &row.get::<_, String>(6)?)?,
    })
}

fn insert_task(conn: &Connection, task: &AddTask, created_at: Timestamp) -> Result<Task> {
    conn.execute(
        INSERT_TASK_SQL,
        params![
            &task.title,
            task.duration,
            task.priority.as_str(),
            task.deadline.map(|t| t.to_string()),
            task.fixed_time.map(|t| t.to_string()),
            created_at.to_string()
        ],
    )
    .db_context("Failed to insert task")?;

    let stored = Task {
        id: conn.last_insert_rowid() as u64,
        title: task.title.clone(),
        duration: task.duration,
        priority: task.priority,
        deadline: task.deadline,
        fixed_time: task.fixed_time,
        created_at,
    };
    super::Database::record_mutation(
        conn,
        SyncEntity::Task,
        SyncOperation::Upsert,
        &serde_json::to_value(&stored)?,
    )?;
    Ok(stored)
}

impl super::Database {
    /// Inserts one task. Input is expected to be validated by the caller.
    pub fn add_task(&mut self, task: &AddTask) -> Result<Task> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;
        let stored = insert_task(&tx, task, Timestamp::now())?;
        tx.commit().db_context("Failed to commit transaction")?;
        Ok(stored)
    }

    /// Inserts several tasks atomically, preserving their order.
    pub fn add_tasks(&mut self, tasks: &[AddTask]) -> Result<Vec<Task>> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;
        let now = Timestamp::now();
        let stored = tasks
            .iter()
            .map(|task| insert_task(&tx, task, now))
            .collect::<Result<Vec<_>>>()?;
        tx.commit().db_context("Failed to commit transaction")?;
        Ok(stored)
    }

    pub fn get_task(&self, id: u64) -> Result<Option<Task>> {
        self.connection
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                params![id as i64],
                task_from_row,
            )
            .optional()
            .db_context("Failed to query task")
    }

    /// Lists tasks in the order they were added.
    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        let mut stmt = self
            .connection
            .prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY id ASC"))
            .db_context("Failed to prepare query")?;

        let tasks = stmt
            .query_map([], task_from_row)
            .db_context("Failed to query tasks")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read task")?;
        Ok(tasks)
    }

    /// Removes a task and returns it, or `None` when no task has that ID.
    pub fn remove_task(&mut self, id: u64) -> Result<Option<Task>> {
        let Some(task) = self.get_task(id)? else {
            return Ok(None);
        };

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;
        tx.execute(DELETE_TASK_SQL, params![id as i64])
            .db_context("Failed to delete task")?;
        Self::record_mutation(&tx, SyncEntity::Task, SyncOperation::Delete, &json!({ "id": id }))?;
        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Some(task))
    }

    /// Deletes every task. Returns how many were removed.
    pub fn clear_tasks(&mut self) -> Result<usize> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;
        let removed = tx
            .execute(DELETE_ALL_TASKS_SQL, [])
            .db_context("Failed to clear tasks")?;
        Self::record_mutation(&tx, SyncEntity::Task, SyncOperation::Clear, &json!({}))?;
        tx.commit().db_context("Failed to commit transaction")?;
        Ok(removed)
    }
}
