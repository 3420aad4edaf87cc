//! Database schema initialization and migrations.

use crate::error::{DatabaseResultExt, Result};

impl super::Database {
    /// Initializes the database schema using the embedded SQL file.
    pub(super) fn initialize_schema(&self) -> Result<()> {
        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")?;

        self.apply_migrations()?;

        Ok(())
    }

    /// Apply database migrations for existing databases
    fn apply_migrations(&self) -> Result<()> {
        // Early databases stored history without the input task text.
        let has_tasks_text: bool = self
            .connection
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('history') WHERE name = 'tasks_text'",
                [],
                |row| row.get(0),
            )
            .map(|count: i64| count > 0)
            .db_context("Failed to inspect history table")?;

        if !has_tasks_text {
            self.connection
                .execute(
                    "ALTER TABLE history ADD COLUMN tasks_text TEXT NOT NULL DEFAULT ''",
                    [],
                )
                .db_context("Failed to add tasks_text column to history table")?;
        }

        Ok(())
    }
}
