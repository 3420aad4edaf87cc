//! Task operations for the Planner.

use log::{debug, warn};

use super::Planner;
use crate::{
    error::{PlannerError, Result},
    models::Task,
    params::{AddTask, Confirm, Id, ImportTasks, MAX_DURATION},
    text,
};

/// Outcome of a bulk import.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSummary {
    pub imported: Vec<Task>,
    /// Lines dropped because their title was empty
    pub skipped: usize,
}

fn validate_task(params: &AddTask) -> Result<AddTask> {
    let title = params.title.trim();
    if title.is_empty() {
        return Err(
            PlannerError::invalid_input("title").with_reason("Task title must not be empty")
        );
    }
    if params.duration == 0 || params.duration > MAX_DURATION {
        return Err(PlannerError::invalid_input("duration").with_reason(format!(
            "Duration must be between 1 and {MAX_DURATION} minutes"
        )));
    }
    Ok(AddTask {
        title: title.to_string(),
        ..params.clone()
    })
}

impl Planner {
    /// Adds a task after validating its title and duration.
    pub async fn add_task(&self, params: &AddTask) -> Result<Task> {
        let task = validate_task(params)?;
        debug!("Adding task '{}' ({} min)", task.title, task.duration);
        self.with_database(move |db| db.add_task(&task)).await
    }

    /// Lists tasks in the order they were added.
    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        self.with_database(|db| db.list_tasks()).await
    }

    pub async fn get_task(&self, params: &Id) -> Result<Option<Task>> {
        let id = params.id;
        self.with_database(move |db| db.get_task(id)).await
    }

    /// Removes a task and returns it.
    pub async fn remove_task(&self, params: &Id) -> Result<Task> {
        let id = params.id;
        self.with_database(move |db| db.remove_task(id))
            .await?
            .ok_or(PlannerError::TaskNotFound { id })
    }

    /// Deletes every task. Requires confirmation.
    pub async fn clear_tasks(&self, params: &Confirm) -> Result<usize> {
        if !params.confirmed {
            return Err(PlannerError::invalid_input("confirmed")
                .with_reason("Clearing all tasks requires confirmation"));
        }
        self.with_database(|db| db.clear_tasks()).await
    }

    /// Parses bulk text and stores every line with a non-empty title, in one
    /// transaction.
    pub async fn import_tasks(&self, params: &ImportTasks) -> Result<ImportSummary> {
        let drafts = text::parse_tasks(&params.text);
        let total = drafts.len();
        let valid: Vec<AddTask> = drafts
            .into_iter()
            .filter(|draft| {
                let keep = !draft.title.trim().is_empty();
                if !keep {
                    warn!("Skipping imported line without a title");
                }
                keep
            })
            .collect();
        let skipped = total - valid.len();

        debug!("Importing {} task(s), skipping {skipped}", valid.len());
        let imported = if valid.is_empty() {
            Vec::new()
        } else {
            self.with_database(move |db| db.add_tasks(&valid)).await?
        };

        Ok(ImportSummary { imported, skipped })
    }

    /// Serializes the current task list in bulk-import format.
    pub async fn export_tasks(&self) -> Result<String> {
        let tasks = self.list_tasks().await?;
        Ok(text::export_tasks(&tasks))
    }
}
