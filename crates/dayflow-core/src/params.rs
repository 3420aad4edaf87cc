//! Parameter structures for Dayflow operations
//!
//! This module contains shared parameter structures used by every front end
//! (the CLI today) without framework-specific derives. Interface layers wrap
//! them with their own argument types and convert via `From`:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │  Core Params    │    │    Planner      │
//! │  (clap derives) │───▶│ (serde only)    │───▶│   operations    │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::models::{ClockTime, ItemKind, Language, Priority, Segment, Task};

/// Generic parameters for operations requiring just an ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Id {
    /// The ID of the resource to operate on
    pub id: u64,
}

/// Parameters for adding a task.
///
/// Also the output of the bulk-import parser, one value per input line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddTask {
    /// Title of the task (required)
    pub title: String,
    /// Duration in minutes
    pub duration: u32,
    #[serde(default)]
    pub priority: Priority,
    pub deadline: Option<ClockTime>,
    pub fixed_time: Option<ClockTime>,
}

impl Default for AddTask {
    fn default() -> Self {
        Self {
            title: String::new(),
            duration: DEFAULT_DURATION,
            priority: Priority::Medium,
            deadline: None,
            fixed_time: None,
        }
    }
}

/// Duration assumed when none is given, in minutes.
pub const DEFAULT_DURATION: u32 = 30;

/// Longest accepted task or item duration: one whole day, in minutes.
pub const MAX_DURATION: u32 = 24 * 60;

impl From<&Task> for AddTask {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            duration: task.duration,
            priority: task.priority,
            deadline: task.deadline,
            fixed_time: task.fixed_time,
        }
    }
}

/// Parameters for importing tasks from bulk text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportTasks {
    /// One task per line, see [`crate::text::parse_tasks`]
    pub text: String,
}

/// Parameters for destructive bulk operations that need confirmation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Confirm {
    pub confirmed: bool,
}

/// Parameters for generating a day plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratePlan {
    /// Prompt and reply language; falls back to the stored setting
    pub language: Option<Language>,
}

/// A single change to one field of a schedule item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ItemEdit {
    Time(String),
    Title(String),
    Kind(ItemKind),
    Duration(u32),
    Reason(Option<String>),
}

/// One edit against the current day plan. Indices are zero-based.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanEdit {
    MoveUp {
        segment: Segment,
        index: usize,
    },
    MoveDown {
        segment: Segment,
        index: usize,
    },
    Remove {
        segment: Segment,
        index: usize,
        confirmed: bool,
    },
    Update {
        segment: Segment,
        index: usize,
        edit: ItemEdit,
    },
}

/// A batch of edits applied to one draft and saved together.
#[derive(Debug, Clone, Default)]
pub struct EditPlan {
    pub edits: Vec<PlanEdit>,
}

/// Parameters for storing the API credential.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetApiKey {
    pub key: String,
}

/// Parameters for enabling remote sync.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnableSync {
    /// Identifier of the remote account the mutations belong to
    pub user_id: String,
    /// Base URL of the sync service
    pub endpoint: String,
}
