//! Builder for creating and configuring Planner instances.

use std::path::{Path, PathBuf};

use log::info;
use tokio::task;

use super::Planner;
use crate::{
    db::Database,
    error::{PlannerError, Result},
    schedule::{ScheduleClient, ScheduleClientConfig},
};

/// Builder for creating and configuring Planner instances.
#[derive(Debug, Clone, Default)]
pub struct PlannerBuilder {
    database_path: Option<PathBuf>,
    schedule: ScheduleClientConfig,
}

impl PlannerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/dayflow/dayflow.db` or `~/.local/share/dayflow/dayflow.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.database_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Overrides the model API root, e.g. to point at a local mock.
    pub fn with_llm_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.schedule.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.schedule.model = model.into();
        self
    }

    /// Request timeout for generation calls, in seconds.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.schedule.timeout_secs = timeout_secs;
        self
    }

    /// Builds the configured planner instance.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::FileSystem` if the database path is invalid
    /// Returns `PlannerError::Database` if database initialization fails
    pub async fn build(self) -> Result<Planner> {
        let db_path = if let Some(path) = self.database_path {
            path
        } else {
            Self::default_database_path()?
        };

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| PlannerError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || {
            let _db = Database::new(&db_path_clone)?;
            Ok::<(), PlannerError>(())
        })
        .await
        .map_err(|e| PlannerError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        let client = ScheduleClient::new(self.schedule)?;
        info!("Planner ready with database {}", db_path.display());
        Ok(Planner::new(db_path, client))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("dayflow")
            .place_data_file("dayflow.db")
            .map_err(|e| PlannerError::XdgDirectory(e.to_string()))
    }
}
