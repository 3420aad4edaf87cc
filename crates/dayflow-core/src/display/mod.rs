//! Display formatting functions and result types.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! collections and operation results are wrapped in newtypes so each context
//! gets its own formatting. Everything renders to markdown.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │ Wrappers &      │    │   Formatted     │
//! │ (Task, DayPlan) │───▶│ Result Types    │───▶│    Output       │
//! │                 │    │                 │    │   (Terminal)    │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`collections`]: Collection wrapper types (Tasks, HistoryEntries)
//! - [`results`]: Operation result types (CreateResult, UpdateResult, DeleteResult)
//! - [`status`]: Status and confirmation messages (OperationStatus)
//! - [`datetime`]: Timestamp and duration formatting
//! - [`models`]: Display implementations for domain models
//!
//! # Examples
//!
//! ```rust
//! use dayflow_core::display::OperationStatus;
//!
//! let status = OperationStatus::success("Cleared 3 task(s)");
//! assert_eq!(status.to_string(), "Success: Cleared 3 task(s)\n");
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use collections::{HistoryEntries, Tasks};
pub use datetime::{LocalDateTime, Minutes};
pub use results::{CreateResult, DeleteResult, UpdateResult};
pub use status::{OperationStatus, StatusLevel};
