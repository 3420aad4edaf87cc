//! Result wrapper types for displaying operation outcomes.

use std::fmt;

use crate::{
    models::{DayPlan, HistoryTotals, Task},
    planner::{GenerationOutcome, ImportSummary, SettingsOverview},
    sync::{SyncReport, SyncStatus},
};

/// Wrapper type for displaying the result of create operations.
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult<Task> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Added task with ID: {}", self.resource.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper type for displaying the result of update operations, with the
/// list of changes that took effect.
///
/// # Examples
///
/// ```rust
/// use dayflow_core::{display::UpdateResult, models::DayPlan};
///
/// let result = UpdateResult::with_changes(
///     DayPlan::default(),
///     vec!["Moved morning item 2 up".to_string()],
/// );
/// let output = result.to_string();
/// assert!(output.contains("Changes made:"));
/// assert!(output.contains("- Moved morning item 2 up"));
/// ```
pub struct UpdateResult<T> {
    pub resource: T,
    pub changes: Vec<String>,
}

impl<T> UpdateResult<T> {
    pub fn new(resource: T) -> Self {
        Self {
            resource,
            changes: Vec::new(),
        }
    }

    pub fn with_changes(resource: T, changes: Vec<String>) -> Self {
        Self { resource, changes }
    }
}

impl fmt::Display for UpdateResult<DayPlan> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.changes.is_empty() {
            writeln!(f, "Plan unchanged.")?;
        } else {
            writeln!(f, "Updated plan.")?;
            writeln!(f)?;
            writeln!(f, "Changes made:")?;
            for change in &self.changes {
                writeln!(f, "- {change}")?;
            }
        }
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper type for displaying the result of delete operations.
pub struct DeleteResult<T> {
    pub resource: T,
}

impl<T> DeleteResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for DeleteResult<Task> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Removed task '{}' (ID: {})",
            self.resource.title, self.resource.id
        )
    }
}

impl fmt::Display for GenerationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Your day plan")?;
        writeln!(f)?;
        if let Some(budget) = &self.budget {
            writeln!(f, "> **Warning:** {budget}")?;
            writeln!(f)?;
        }
        write!(f, "{}", self.entry.plan)?;
        writeln!(f)?;
        writeln!(
            f,
            "_Saved as history entry {} · {} · {}_",
            self.entry.id, self.entry.model, self.entry.token_usage
        )
    }
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Imported {} task(s).", self.imported.len())?;
        if self.skipped > 0 {
            writeln!(f, "Skipped {} line(s) without a title.", self.skipped)?;
        }
        if !self.imported.is_empty() {
            writeln!(f)?;
            for task in &self.imported {
                write!(f, "{task}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for HistoryTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Total: {} generation(s) · {} tokens · ${:.6}",
            self.entries, self.total_tokens, self.total_cost
        )
    }
}

impl fmt::Display for SettingsOverview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Settings")?;
        writeln!(f)?;
        match &self.masked_api_key {
            Some(key) => writeln!(f, "- API key: `{key}`")?,
            None => writeln!(f, "- API key: not set")?,
        }
        writeln!(f, "- Language: {}", self.language)?;
        match &self.sync {
            Some(sync) => writeln!(f, "- Sync: {} at {}", sync.user_id, sync.endpoint),
            None => writeln!(f, "- Sync: disabled"),
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.settings {
            Some(sync) => writeln!(f, "Sync enabled for {} at {}", sync.user_id, sync.endpoint)?,
            None => writeln!(f, "Sync disabled")?,
        }
        writeln!(f, "Pending changes: {}", self.pending)
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pushed {} change(s), {} pending.", self.pushed, self.pending)?;
        if let Some(failure) = &self.failure {
            writeln!(f, "Stopped early: {failure}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::models::{HistoryEntry, TimeBudget, TokenUsage};

    #[test]
    fn test_generation_outcome_shows_budget_warning() {
        let outcome = GenerationOutcome {
            entry: HistoryEntry {
                id: 3,
                created_at: Timestamp::UNIX_EPOCH,
                plan: DayPlan::default(),
                tasks_count: 2,
                token_usage: TokenUsage::default(),
                model: "gemini-2.5-flash".to_string(),
                tasks_text: String::new(),
            },
            budget: Some(TimeBudget {
                needed: 300,
                available: 90,
            }),
        };
        let output = outcome.to_string();
        assert!(output.contains("need 5h but only 1h 30m are left"));
        assert!(output.contains("history entry 3"));
    }

    #[test]
    fn test_sync_report_mentions_failure() {
        let report = SyncReport {
            pushed: 2,
            pending: 1,
            failure: Some("Entry 3 rejected".to_string()),
        };
        assert!(report.to_string().contains("Stopped early: Entry 3 rejected"));
    }
}
