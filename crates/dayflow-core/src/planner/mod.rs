//! High-level planner API for tasks, day plans, history and sync.
//!
//! This module provides the main [`Planner`] interface. The planner is the
//! explicitly constructed context every front end receives: it knows where
//! the database lives and owns the schedule generation client. Nothing else
//! is global.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   Operations    │    │  Domain logic   │    │    Database     │
//! │ (task_ops,      │───▶│ (prompt, editor,│───▶│   (via db/)     │
//! │  plan_ops, ...) │    │  schedule, text)│    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! Every operation opens its own connection on a blocking worker thread, so
//! calls share no mutable state.
//!
//! ## Submodules
//!
//! - [`builder`]: Factory for creating [`Planner`] instances with configuration
//! - [`task_ops`]: Task list management and bulk import/export
//! - [`plan_ops`]: Generation, viewing and editing of the day plan
//! - [`history_ops`]: Generation history
//! - [`settings_ops`]: API key and language settings
//! - [`sync_ops`]: Sync configuration and outbox delivery
//!
//! # Usage Examples
//!
//! ```rust
//! use dayflow_core::{params::AddTask, PlannerBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = PlannerBuilder::new()
//!     .with_database_path("/tmp/dayflow-example.db")
//!     .build()
//!     .await?;
//!
//! let task = planner
//!     .add_task(&AddTask {
//!         title: "Write report".to_string(),
//!         duration: 90,
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("{task}");
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use tokio::task;

use crate::{
    db::Database,
    error::{PlannerError, Result},
    schedule::ScheduleClient,
};

pub mod builder;
pub mod history_ops;
pub mod plan_ops;
pub mod settings_ops;
pub mod sync_ops;
pub mod task_ops;


pub use builder::PlannerBuilder;
pub use plan_ops::GenerationOutcome;
pub use settings_ops::SettingsOverview;
pub use task_ops::ImportSummary;

/// Main planner interface.
#[derive(Debug, Clone)]
pub struct Planner {
    pub(crate) db_path: PathBuf,
    pub(crate) client: ScheduleClient,
}

impl Planner {
    pub(crate) fn new(db_path: PathBuf, client: ScheduleClient) -> Self {
        Self { db_path, client }
    }

    /// Path of the SQLite database this planner works on.
    pub fn database_path(&self) -> &std::path::Path {
        &self.db_path
    }

    /// Runs `operation` against a fresh connection on a blocking thread.
    pub(crate) async fn with_database<T, F>(&self, operation: F) -> Result<T>
    where
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db_path = self.db_path.clone();
        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            operation(&mut db)
        })
        .await
        .map_err(|e| PlannerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}
