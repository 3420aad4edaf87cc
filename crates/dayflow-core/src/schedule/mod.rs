//! Schedule generation against the Gemini API.
//!
//! [`ScheduleClient`] sends a prompt built by [`crate::prompt`] together with
//! a strict response schema and turns the reply into a
//! [`DayPlan`](crate::models::DayPlan) plus [`TokenUsage`](crate::models::TokenUsage).
//!
//! Failures are typed where they happen: an HTTP 401/403 or an
//! `API_KEY_INVALID` reason is [`PlannerError::CredentialInvalid`], every
//! other failure is [`PlannerError::Generation`].
//!
//! [`PlannerError::CredentialInvalid`]: crate::PlannerError::CredentialInvalid
//! [`PlannerError::Generation`]: crate::PlannerError::Generation

mod client;
mod response;
pub mod schema;

pub use client::{
    GeneratedSchedule, ScheduleClient, ScheduleClientConfig, DEFAULT_BASE_URL, DEFAULT_MODEL,
    DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS,
};
