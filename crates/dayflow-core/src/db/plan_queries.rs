//! Current day plan storage.
//!
//! The live plan is a single JSON row. Generation replaces it and appends the
//! matching history entry in one transaction.

use jiff::Timestamp;
use log::warn;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;

use crate::{
    error::{DatabaseResultExt, Result},
    models::{DayPlan, HistoryEntry, HistorySnapshot},
    sync::{SyncEntity, SyncOperation},
};

const SELECT_CURRENT_PLAN_SQL: &str = "SELECT plan FROM current_plan WHERE id = 1";
const UPSERT_CURRENT_PLAN_SQL: &str = "INSERT INTO current_plan (id, plan, updated_at) VALUES (1, ?1, ?2) \
     ON CONFLICT(id) DO UPDATE SET plan = excluded.plan, updated_at = excluded.updated_at";
const DELETE_CURRENT_PLAN_SQL: &str = "DELETE FROM current_plan";
const INSERT_HISTORY_SQL: &str = "INSERT INTO history (created_at, plan, tasks_count, prompt_tokens, candidates_tokens, total_tokens, estimated_cost, model, tasks_text) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";

fn write_current_plan(conn: &Connection, plan: &DayPlan) -> Result<()> {
    let payload = serde_json::to_value(plan)?;
    conn.execute(
        UPSERT_CURRENT_PLAN_SQL,
        params![payload.to_string(), Timestamp::now().to_string()],
    )
    .db_context("Failed to store current plan")?;
    super::Database::record_mutation(conn, SyncEntity::Plan, SyncOperation::Upsert, &payload)
}

impl super::Database {
    /// Loads the live plan. A row that no longer parses is logged and read as
    /// absent.
    pub fn get_current_plan(&self) -> Result<Option<DayPlan>> {
        let raw: Option<String> = self
            .connection
            .query_row(SELECT_CURRENT_PLAN_SQL, [], |row| row.get(0))
            .optional()
            .db_context("Failed to query current plan")?;

        Ok(raw.and_then(|raw| match serde_json::from_str(&raw) {
            Ok(plan) => Some(plan),
            Err(e) => {
                warn!("Stored plan is malformed, ignoring it: {e}");
                None
            }
        }))
    }

    /// Replaces the live plan.
    pub fn save_current_plan(&mut self, plan: &DayPlan) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;
        write_current_plan(&tx, plan)?;
        tx.commit().db_context("Failed to commit transaction")?;
        Ok(())
    }

    /// Removes the live plan. Returns false when there was none.
    pub fn clear_current_plan(&mut self) -> Result<bool> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;
        let removed = tx
            .execute(DELETE_CURRENT_PLAN_SQL, [])
            .db_context("Failed to clear current plan")?;
        if removed > 0 {
            Self::record_mutation(&tx, SyncEntity::Plan, SyncOperation::Clear, &json!({}))?;
        }
        tx.commit().db_context("Failed to commit transaction")?;
        Ok(removed > 0)
    }

    /// Stores a generation result: the new live plan plus its history entry,
    /// atomically.
    pub fn store_generation(&mut self, snapshot: &HistorySnapshot) -> Result<HistoryEntry> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        write_current_plan(&tx, &snapshot.plan)?;

        let created_at = Timestamp::now();
        let usage = &snapshot.token_usage;
        tx.execute(
            INSERT_HISTORY_SQL,
            params![
                created_at.to_string(),
                serde_json::to_string(&snapshot.plan)?,
                snapshot.tasks_count,
                usage.prompt_tokens as i64,
                usage.candidates_tokens as i64,
                usage.total_tokens as i64,
                usage.estimated_cost,
                &snapshot.model,
                &snapshot.tasks_text
            ],
        )
        .db_context("Failed to insert history entry")?;

        let entry = HistoryEntry {
            id: tx.last_insert_rowid() as u64,
            created_at,
            plan: snapshot.plan.clone(),
            tasks_count: snapshot.tasks_count,
            token_usage: snapshot.token_usage,
            model: snapshot.model.clone(),
            tasks_text: snapshot.tasks_text.clone(),
        };
        Self::record_mutation(
            &tx,
            SyncEntity::History,
            SyncOperation::Upsert,
            &serde_json::to_value(&entry)?,
        )?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(entry)
    }
}
