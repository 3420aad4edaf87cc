//! Generation history and token accounting.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{DayPlan, Task};
use crate::text::export_tasks;

/// Per-token prices used for the cost estimate, in USD per million tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pricing {
    pub input_per_million: f64,
    pub output_per_million: f64,
}

/// Published prices for `gemini-2.5-flash`.
pub const GEMINI_FLASH_PRICING: Pricing = Pricing {
    input_per_million: 0.075,
    output_per_million: 0.30,
};

impl Pricing {
    /// Cost of the prompt side alone.
    pub fn input_cost(&self, prompt_tokens: u64) -> f64 {
        prompt_tokens as f64 / 1_000_000.0 * self.input_per_million
    }

    /// Cost of the candidate (output) side alone.
    pub fn output_cost(&self, candidates_tokens: u64) -> f64 {
        candidates_tokens as f64 / 1_000_000.0 * self.output_per_million
    }

    /// Linear two-term estimate: input cost plus output cost.
    pub fn cost(&self, prompt_tokens: u64, candidates_tokens: u64) -> f64 {
        self.input_cost(prompt_tokens) + self.output_cost(candidates_tokens)
    }
}

impl Default for Pricing {
    fn default() -> Self {
        GEMINI_FLASH_PRICING
    }
}

/// Token counts reported for one generation call and the derived cost.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub candidates_tokens: u64,
    pub total_tokens: u64,
    /// Estimated cost in USD
    pub estimated_cost: f64,
}

impl TokenUsage {
    pub fn new(
        prompt_tokens: u64,
        candidates_tokens: u64,
        total_tokens: u64,
        pricing: &Pricing,
    ) -> Self {
        Self {
            prompt_tokens,
            candidates_tokens,
            total_tokens,
            estimated_cost: pricing.cost(prompt_tokens, candidates_tokens),
        }
    }
}

/// Data captured from a successful generation, before it is stored.
///
/// The plan is cloned on capture, so later edits to the live plan never
/// reach the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistorySnapshot {
    pub plan: DayPlan,
    pub tasks_count: u32,
    pub token_usage: TokenUsage,
    pub model: String,
    /// Input tasks in bulk-import format
    pub tasks_text: String,
}

impl HistorySnapshot {
    pub fn capture(plan: &DayPlan, tasks: &[Task], token_usage: TokenUsage, model: &str) -> Self {
        Self {
            plan: plan.clone(),
            tasks_count: tasks.len() as u32,
            token_usage,
            model: model.to_string(),
            tasks_text: export_tasks(tasks),
        }
    }
}

/// A stored history entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub id: u64,
    pub created_at: Timestamp,
    pub plan: DayPlan,
    pub tasks_count: u32,
    pub token_usage: TokenUsage,
    pub model: String,
    pub tasks_text: String,
}

/// Aggregate usage across a set of history entries.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HistoryTotals {
    pub entries: usize,
    pub total_tokens: u64,
    pub total_cost: f64,
}

impl HistoryTotals {
    pub fn from_entries(entries: &[HistoryEntry]) -> Self {
        entries.iter().fold(
            Self {
                entries: entries.len(),
                ..Self::default()
            },
            |mut acc, entry| {
                acc.total_tokens += entry.token_usage.total_tokens;
                acc.total_cost += entry.token_usage.estimated_cost;
                acc
            },
        )
    }
}
