//! Database operations and SQLite management.
//!
//! This module provides the low-level storage layer of Dayflow. It owns the
//! SQLite connection and schema, and splits its queries by table: tasks, the
//! current plan, generation history, settings and the sync outbox.
//!
//! Writes that touch more than one table run in a single transaction. While
//! sync is enabled, every mutating query also appends its outbox row inside
//! that same transaction.

use std::path::Path;

use jiff::Timestamp;
use rusqlite::{types::Type, Connection};

use crate::error::{DatabaseResultExt, Result};

pub mod history_queries;
pub mod migrations;
pub mod outbox_queries;
pub mod plan_queries;
pub mod settings_queries;
pub mod task_queries;

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Creates a new database connection and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}

/// Wraps a column decoding failure in the error rusqlite expects from row
/// mappers.
pub(crate) fn conversion_error(
    column: usize,
    error: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(error))
}

/// Wraps an invalid stored value in the error rusqlite expects from row
/// mappers.
pub(crate) fn invalid_value(column: usize, message: String) -> rusqlite::Error {
    conversion_error(
        column,
        std::io::Error::new(std::io::ErrorKind::InvalidData, message),
    )
}

pub(crate) fn parse_timestamp(column: usize, raw: &str) -> rusqlite::Result<Timestamp> {
    raw.parse::<Timestamp>()
        .map_err(|e| conversion_error(column, e))
}
