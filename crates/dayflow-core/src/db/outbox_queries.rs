//! Sync outbox queue.

use jiff::Timestamp;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

use super::{invalid_value, parse_timestamp};
use crate::{
    error::{DatabaseResultExt, Result},
    sync::{OutboxEntry, SyncEntity, SyncOperation},
};

const INSERT_OUTBOX_SQL: &str =
    "INSERT INTO outbox (entity, operation, payload, created_at) VALUES (?1, ?2, ?3, ?4)";
const SELECT_OUTBOX_SQL: &str =
    "SELECT seq, entity, operation, payload, created_at FROM outbox ORDER BY seq ASC";
const COUNT_OUTBOX_SQL: &str = "SELECT COUNT(*) FROM outbox";
const DELETE_OUTBOX_ENTRY_SQL: &str = "DELETE FROM outbox WHERE seq = ?1";
const DELETE_ALL_OUTBOX_SQL: &str = "DELETE FROM outbox";
const SYNC_ENABLED_SQL: &str = "SELECT 1 FROM settings WHERE key = 'sync_user'";

impl super::Database {
    /// Queues a mutation when sync is enabled; does nothing otherwise.
    ///
    /// Takes the open transaction so the row commits or rolls back together
    /// with the mutation it describes.
    pub(crate) fn record_mutation(
        conn: &Connection,
        entity: SyncEntity,
        operation: SyncOperation,
        payload: &Value,
    ) -> Result<()> {
        let enabled = conn
            .query_row(SYNC_ENABLED_SQL, [], |_| Ok(()))
            .optional()
            .db_context("Failed to read sync setting")?
            .is_some();
        if !enabled {
            return Ok(());
        }

        conn.execute(
            INSERT_OUTBOX_SQL,
            params![
                entity.as_str(),
                operation.as_str(),
                payload.to_string(),
                Timestamp::now().to_string()
            ],
        )
        .db_context("Failed to queue sync mutation")?;
        Ok(())
    }

    /// Returns every queued entry in delivery order.
    pub fn list_outbox(&self) -> Result<Vec<OutboxEntry>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_OUTBOX_SQL)
            .db_context("Failed to prepare outbox query")?;

        let entries = stmt
            .query_map([], |row| {
                let entity: String = row.get(1)?;
                let operation: String = row.get(2)?;
                let payload: String = row.get(3)?;
                Ok(OutboxEntry {
                    seq: row.get::<_, i64>(0)? as u64,
                    entity: entity.parse::<SyncEntity>().map_err(|e| invalid_value(1, e))?,
                    operation: operation
                        .parse::<SyncOperation>()
                        .map_err(|e| invalid_value(2, e))?,
                    payload: serde_json::from_str(&payload).map_err(|e| {
                        invalid_value(3, format!("Invalid outbox payload: {e}"))
                    })?,
                    created_at: parse_timestamp(4, &row.get::<_, String>(4)?)?,
                })
            })
            .db_context("Failed to query outbox")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read outbox entry")?;

        Ok(entries)
    }

    pub fn pending_outbox_count(&self) -> Result<usize> {
        let count: i64 = self
            .connection
            .query_row(COUNT_OUTBOX_SQL, [], |row| row.get(0))
            .db_context("Failed to count outbox entries")?;
        Ok(count as usize)
    }

    /// Removes an acknowledged entry.
    pub fn delete_outbox_entry(&self, seq: u64) -> Result<()> {
        self.connection
            .execute(DELETE_OUTBOX_ENTRY_SQL, params![seq as i64])
            .db_context("Failed to delete outbox entry")?;
        Ok(())
    }

    pub(crate) fn clear_outbox(conn: &Connection) -> Result<usize> {
        conn.execute(DELETE_ALL_OUTBOX_SQL, [])
            .db_context("Failed to clear outbox")
    }
}
