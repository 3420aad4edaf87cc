//! Generation history queries.

use log::warn;
use rusqlite::{params, OptionalExtension, Row};
use serde_json::json;

use super::parse_timestamp;
use crate::{
    error::{DatabaseResultExt, Result},
    models::{DayPlan, HistoryEntry, TokenUsage},
    sync::{SyncEntity, SyncOperation},
};

const HISTORY_COLUMNS: &str = "id, created_at, plan, tasks_count, prompt_tokens, candidates_tokens, total_tokens, estimated_cost, model, tasks_text";
const DELETE_ALL_HISTORY_SQL: &str = "DELETE FROM history";

fn history_from_row(row: &Row<'_>) -> rusqlite::Result<HistoryEntry> {
    let id = row.get::<_, i64>(0)? as u64;
    let raw_plan: String = row.get(2)?;
    let plan = serde_json::from_str::<DayPlan>(&raw_plan).unwrap_or_else(|e| {
        warn!("History entry {id} has a malformed plan, showing it empty: {e}");
        DayPlan::default()
    });

    Ok(HistoryEntry {
        id,
        created_at: parse_timestamp(1, &row.get::<_, String>(1)?)?,
        plan,
        tasks_count: row.get(3)?,
        token_usage: TokenUsage {
            prompt_tokens: row.get::<_, i64>(4)? as u64,
            candidates_tokens: row.get::<_, i64>(5)? as u64,
            total_tokens: row.get::<_, i64>(6)? as u64,
            estimated_cost: row.get(7)?,
        },
        model: row.get(8)?,
        tasks_text: row.get(9)?,
    })
}

impl super::Database {
    /// Lists history entries, most recent first.
    pub fn list_history(&self) -> Result<Vec<HistoryEntry>> {
        let mut stmt = self
            .connection
            .prepare(&format!(
                "SELECT {HISTORY_COLUMNS} FROM history ORDER BY created_at DESC, id DESC"
            ))
            .db_context("Failed to prepare query")?;

        let entries = stmt
            .query_map([], history_from_row)
            .db_context("Failed to query history")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read history entry")?;
        Ok(entries)
    }

    pub fn get_history(&self, id: u64) -> Result<Option<HistoryEntry>> {
        self.connection
            .query_row(
                &format!("SELECT {HISTORY_COLUMNS} FROM history WHERE id = ?1"),
                params![id as i64],
                history_from_row,
            )
            .optional()
            .db_context("Failed to query history entry")
    }

    /// Deletes every history entry. Returns how many were removed.
    pub fn clear_history(&mut self) -> Result<usize> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;
        let removed = tx
            .execute(DELETE_ALL_HISTORY_SQL, [])
            .db_context("Failed to clear history")?;
        Self::record_mutation(&tx, SyncEntity::History, SyncOperation::Clear, &json!({}))?;
        tx.commit().db_context("Failed to commit transaction")?;
        Ok(removed)
    }
}
