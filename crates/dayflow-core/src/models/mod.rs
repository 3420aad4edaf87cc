//! Data models for tasks, day plans and generation history.
//!
//! This module contains the core domain models of the Dayflow planner.
//! Display implementations for these models live in
//! [`crate::display::models`] so that data structures stay separate from
//! presentation logic.
//!
//! - [`Task`]: user input waiting to be scheduled, optionally pinned to a
//!   [`ClockTime`]
//! - [`DayPlan`]: the model's schedule, split into [`Segment`]s of
//!   [`ScheduleItem`]s plus tips
//! - [`HistoryEntry`]: an immutable snapshot of a past generation with its
//!   [`TokenUsage`]
//!
//! # Examples
//!
//! ```rust
//! use dayflow_core::models::{ClockTime, DayPlan, ItemKind, ScheduleItem};
//!
//! let plan = DayPlan {
//!     morning: vec![ScheduleItem {
//!         time: "09:00".to_string(),
//!         task_title: "Write report".to_string(),
//!         kind: ItemKind::Work,
//!         duration: 60,
//!         reason: None,
//!     }],
//!     ..Default::default()
//! };
//!
//! let now = ClockTime::new(9, 15).unwrap();
//! let current = plan.current_item(now).unwrap();
//! assert_eq!(current.remaining, 45);
//! assert_eq!(current.progress, 25);
//! ```

pub mod history;
pub mod language;
pub mod schedule;
pub mod task;


pub use history::{
    HistoryEntry, HistorySnapshot, HistoryTotals, Pricing, TokenUsage, GEMINI_FLASH_PRICING,
};
pub use language::Language;
pub use schedule::{CurrentItem, DayPlan, ItemKind, ScheduleItem, Segment, TimeBudget};
pub use task::{ClockTime, Priority, Task};
