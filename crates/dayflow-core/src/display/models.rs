//! Display implementations for domain models.
//!
//! All output is markdown, rendered by the CLI's terminal renderer. Schedule
//! segments are tables whose `#` column is the 1-based position used by the
//! plan editing commands.

use std::fmt;

use super::datetime::{LocalDateTime, Minutes};
use crate::models::{
    CurrentItem, DayPlan, HistoryEntry, ItemKind, Language, Priority, ScheduleItem, Segment, Task,
    TimeBudget, TokenUsage,
};

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Language::Vi => "Tiếng Việt (vi)",
            Language::En => "English (en)",
        })
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "- **#{}** {} · {} · {}",
            self.id,
            self.title,
            Minutes(self.duration),
            self.priority
        )?;
        if let Some(fixed) = self.fixed_time {
            write!(f, " · at {fixed}")?;
        }
        if let Some(deadline) = self.deadline {
            write!(f, " · due {deadline}")?;
        }
        writeln!(f)
    }
}

/// Escapes text for use inside a markdown table cell.
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn kind_marker(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::Work => "work",
        ItemKind::Break => "☕ break",
        ItemKind::Buffer => "⏳ buffer",
    }
}

fn write_segment(
    f: &mut fmt::Formatter<'_>,
    segment: Segment,
    items: &[ScheduleItem],
) -> fmt::Result {
    writeln!(f, "## {segment}")?;
    writeln!(f)?;
    if items.is_empty() {
        writeln!(f, "_Nothing scheduled._")?;
        return writeln!(f);
    }

    writeln!(f, "| # | Time | Task | Type | Duration | Reason |")?;
    writeln!(f, "|--:|:----:|------|------|---------:|--------|")?;
    for (index, item) in items.iter().enumerate() {
        writeln!(
            f,
            "| {} | {} | {} | {} | {} | {} |",
            index + 1,
            cell(&item.time),
            cell(&item.task_title),
            kind_marker(item.kind),
            Minutes(item.duration),
            item.reason.as_deref().map(cell).unwrap_or_default()
        )?;
    }
    writeln!(f)
}

impl fmt::Display for DayPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in Segment::ALL {
            write_segment(f, segment, self.segment(segment))?;
        }

        if !self.tips.is_empty() {
            writeln!(f, "## Tips")?;
            writeln!(f)?;
            for tip in &self.tips {
                writeln!(f, "- {tip}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for CurrentItem<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Now: {}", self.item.task_title)?;
        writeln!(f)?;
        writeln!(
            f,
            "- {} at {} ({}, {})",
            self.segment,
            self.item.time,
            kind_marker(self.item.kind),
            Minutes(self.item.duration)
        )?;
        writeln!(f, "- Remaining: {}", Minutes(self.remaining))?;
        let filled = (self.progress.min(100) / 5) as usize;
        writeln!(
            f,
            "- Progress: `{}{}` {}%",
            "█".repeat(filled),
            "░".repeat(20 - filled),
            self.progress
        )?;
        if let Some(reason) = &self.item.reason {
            writeln!(f)?;
            writeln!(f, "{reason}")?;
        }
        Ok(())
    }
}

impl fmt::Display for TokenUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tokens ({} in / {} out) · ${:.6}",
            self.total_tokens, self.prompt_tokens, self.candidates_tokens, self.estimated_cost
        )
    }
}

impl fmt::Display for TimeBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Your tasks need {} but only {} are left today. Some tasks may move to tomorrow.",
            Minutes(self.needed),
            Minutes(self.available)
        )
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# History entry {}", self.id)?;
        writeln!(f)?;
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Model: {}", self.model)?;
        writeln!(f, "- Tasks: {}", self.tasks_count)?;
        writeln!(f, "- Usage: {}", self.token_usage)?;
        writeln!(f)?;
        write!(f, "{}", self.plan)
    }
}
