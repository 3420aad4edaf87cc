//! History operations for the Planner.

use super::Planner;
use crate::{
    error::{PlannerError, Result},
    models::{HistoryEntry, HistoryTotals},
    params::{Confirm, Id},
};

impl Planner {
    /// Lists generation history, most recent first.
    pub async fn list_history(&self) -> Result<Vec<HistoryEntry>> {
        self.with_database(|db| db.list_history()).await
    }

    pub async fn get_history(&self, params: &Id) -> Result<HistoryEntry> {
        let id = params.id;
        self.with_database(move |db| db.get_history(id))
            .await?
            .ok_or(PlannerError::HistoryNotFound { id })
    }

    /// Returns the input tasks of a past generation in bulk-import format.
    pub async fn export_history_tasks(&self, params: &Id) -> Result<String> {
        Ok(self.get_history(params).await?.tasks_text)
    }

    /// Token and cost totals over the whole history.
    pub async fn history_totals(&self) -> Result<HistoryTotals> {
        let entries = self.list_history().await?;
        Ok(HistoryTotals::from_entries(&entries))
    }

    /// Deletes every history entry. Requires confirmation.
    pub async fn clear_history(&self, params: &Confirm) -> Result<usize> {
        if !params.confirmed {
            return Err(PlannerError::invalid_input("confirmed")
                .with_reason("Clearing history requires confirmation"));
        }
        self.with_database(|db| db.clear_history()).await
    }
}
