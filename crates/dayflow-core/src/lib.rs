//! Core library for the Dayflow day planner.
//!
//! Dayflow keeps a list of tasks, asks a language model (Gemini) to arrange
//! them into a morning/afternoon/evening schedule, and lets the user edit the
//! result. Every generation is kept in a history log, and local changes can be
//! pushed to a remote store through an ordered outbox.
//!
//! # Display Architecture
//!
//! - **Domain Models** ([`models`]): Implement [`std::fmt::Display`] for direct
//!   formatting
//! - **Display Wrappers** ([`display`]): Provide contextual and specialized
//!   formatting
//! - **Terminal Rendering**: Rich markdown output via the CLI's terminal
//!   renderer
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use dayflow_core::{
//!     params::{GeneratePlan, ImportTasks, SetApiKey},
//!     PlannerBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = PlannerBuilder::new()
//!     .with_database_path("dayflow.db")
//!     .build()
//!     .await?;
//!
//! planner
//!     .set_api_key(&SetApiKey { key: "AIza...".to_string() })
//!     .await?;
//! planner
//!     .import_tasks(&ImportTasks {
//!         text: "Meeting - 60p - 9am !cao\nWrite report - 2h".to_string(),
//!     })
//!     .await?;
//!
//! let outcome = planner.generate_plan(&GeneratePlan::default()).await?;
//! println!("{outcome}");
//! # Ok(())
//! # }
//! ```

pub mod credential;
pub mod db;
pub mod display;
pub mod editor;
pub mod error;
pub mod models;
pub mod params;
pub mod planner;
pub mod prompt;
pub mod schedule;
pub mod sync;
pub mod text;

// Re-export commonly used types
pub use db::Database;
pub use display::{CreateResult, DeleteResult, OperationStatus, Tasks, UpdateResult};
pub use editor::PlanEditor;
pub use error::{FailureKind, PlannerError, Result};
pub use models::{
    ClockTime, CurrentItem, DayPlan, HistoryEntry, ItemKind, Language, Priority, ScheduleItem,
    Segment, Task, TimeBudget, TokenUsage,
};
pub use params::{
    AddTask, Confirm, EditPlan, EnableSync, GeneratePlan, Id, ImportTasks, ItemEdit, PlanEdit,
    SetApiKey,
};
pub use planner::{GenerationOutcome, ImportSummary, Planner, PlannerBuilder, SettingsOverview};
pub use schedule::{ScheduleClient, ScheduleClientConfig};
pub use sync::{HttpSyncTarget, OutboxEntry, SyncReport, SyncStatus, SyncTarget};
