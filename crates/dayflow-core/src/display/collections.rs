//! Collection wrapper types for displaying groups of domain objects.

use std::{fmt, ops::Deref};

use super::datetime::{LocalDateTime, Minutes};
use crate::models::{HistoryEntry, Task};

/// Newtype wrapper for displaying the task list.
///
/// # Examples
///
/// ```rust
/// use dayflow_core::{display::Tasks, models::{Priority, Task}};
/// use jiff::Timestamp;
///
/// let tasks = Tasks(vec![Task {
///     id: 1,
///     title: "Write report".to_string(),
///     duration: 90,
///     priority: Priority::High,
///     deadline: None,
///     fixed_time: None,
///     created_at: Timestamp::now(),
/// }]);
/// let output = tasks.to_string();
/// assert!(output.contains("Write report · 1h 30m · High"));
/// assert!(output.contains("Total: 1h 30m"));
/// ```
pub struct Tasks(pub Vec<Task>);

impl Deref for Tasks {
    type Target = [Task];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Tasks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No tasks yet. Add one with `dayflow task add`.");
        }
        for task in &self.0 {
            write!(f, "{task}")?;
        }
        let total = self
            .0
            .iter()
            .fold(0u32, |total, task| total.saturating_add(task.duration));
        writeln!(f)?;
        writeln!(f, "Total: {} across {} task(s)", Minutes(total), self.0.len())
    }
}

/// Newtype wrapper for displaying history entries as a compact list.
pub struct HistoryEntries(pub Vec<HistoryEntry>);

impl Deref for HistoryEntries {
    type Target = [HistoryEntry];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for HistoryEntries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No history yet.");
        }
        for entry in &self.0 {
            writeln!(
                f,
                "- **#{}** {} · {} task(s) · {} item(s) · {}",
                entry.id,
                LocalDateTime(&entry.created_at),
                entry.tasks_count,
                entry.plan.item_count(),
                entry.token_usage
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::models::Priority;

    #[test]
    fn test_empty_collections() {
        assert!(Tasks(vec![]).to_string().contains("No tasks yet"));
        assert!(HistoryEntries(vec![]).to_string().contains("No history yet"));
    }

    #[test]
    fn test_task_total_saturates() {
        let task = |id, duration| Task {
            id,
            title: format!("Task {id}"),
            duration,
            priority: Priority::Medium,
            deadline: None,
            fixed_time: None,
            created_at: Timestamp::UNIX_EPOCH,
        };
        let output = Tasks(vec![task(1, u32::MAX), task(2, u32::MAX)]).to_string();
        assert!(output.contains("across 2 task(s)"));
    }
}
