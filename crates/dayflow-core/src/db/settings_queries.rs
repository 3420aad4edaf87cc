//! Key/value settings: API key, language and sync account.

use log::warn;
use rusqlite::{params, Connection, OptionalExtension};

use crate::{
    error::{DatabaseResultExt, Result},
    models::Language,
    sync::SyncSettings,
};

pub const API_KEY_SETTING: &str = "api_key";
pub const LANGUAGE_SETTING: &str = "language";
pub const SYNC_USER_SETTING: &str = "sync_user";
pub const SYNC_ENDPOINT_SETTING: &str = "sync_endpoint";

const SELECT_SETTING_SQL: &str = "SELECT value FROM settings WHERE key = ?1";
const UPSERT_SETTING_SQL: &str = "INSERT INTO settings (key, value) VALUES (?1, ?2) \
     ON CONFLICT(key) DO UPDATE SET value = excluded.value";
const DELETE_SETTING_SQL: &str = "DELETE FROM settings WHERE key = ?1";

fn upsert(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(UPSERT_SETTING_SQL, params![key, value])
        .db_context("Failed to store setting")?;
    Ok(())
}

fn delete(conn: &Connection, key: &str) -> Result<bool> {
    let removed = conn
        .execute(DELETE_SETTING_SQL, params![key])
        .db_context("Failed to delete setting")?;
    Ok(removed > 0)
}

impl super::Database {
    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        self.connection
            .query_row(SELECT_SETTING_SQL, params![key], |row| row.get(0))
            .optional()
            .db_context("Failed to read setting")
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        upsert(&self.connection, key, value)
    }

    /// Returns true if the key existed.
    pub fn delete_setting(&self, key: &str) -> Result<bool> {
        delete(&self.connection, key)
    }

    pub fn api_key(&self) -> Result<Option<String>> {
        self.get_setting(API_KEY_SETTING)
    }

    /// Stored language, falling back to the default for unknown values.
    pub fn language(&self) -> Result<Language> {
        Ok(match self.get_setting(LANGUAGE_SETTING)? {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                warn!("Ignoring stored language setting: {e}");
                Language::default()
            }),
            None => Language::default(),
        })
    }

    pub fn sync_settings(&self) -> Result<Option<SyncSettings>> {
        let user_id = self.get_setting(SYNC_USER_SETTING)?;
        let endpoint = self.get_setting(SYNC_ENDPOINT_SETTING)?;
        Ok(match (user_id, endpoint) {
            (Some(user_id), Some(endpoint)) => Some(SyncSettings { user_id, endpoint }),
            (Some(_), None) => {
                warn!("Sync user is set without an endpoint; treating sync as disabled");
                None
            }
            _ => None,
        })
    }

    pub fn enable_sync(&mut self, settings: &SyncSettings) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;
        upsert(&tx, SYNC_USER_SETTING, &settings.user_id)?;
        upsert(&tx, SYNC_ENDPOINT_SETTING, &settings.endpoint)?;
        tx.commit().db_context("Failed to commit transaction")?;
        Ok(())
    }

    /// Turns sync off and drops every queued entry. Returns the number of
    /// entries dropped.
    pub fn disable_sync(&mut self) -> Result<usize> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;
        delete(&tx, SYNC_USER_SETTING)?;
        delete(&tx, SYNC_ENDPOINT_SETTING)?;
        let dropped = Self::clear_outbox(&tx)?;
        tx.commit().db_context("Failed to commit transaction")?;
        Ok(dropped)
    }
}
