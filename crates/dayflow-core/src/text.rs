//! Plain-text task format used for bulk import and history export.
//!
//! One task per line:
//!
//! ```text
//! Title [- duration] [- time] [!priority]
//! ```
//!
//! Fields are separated by `-` or `|`. The duration is `<n>h` (hours, may be
//! fractional) or `<n>[p]` (minutes). The time is `H[:MM](am|pm)` or
//! `HH[:MM]`. The priority marker (`!cao`, `!thấp`/`!thap`, `!trung`/
//! `!trungbinh`) may appear anywhere on the line.
//!
//! Parsing is best-effort: a malformed field falls back to its default and the
//! line is still imported. Durations longer than a day count as malformed.

use std::sync::LazyLock;

use regex::Regex;

use crate::{
    models::{ClockTime, Priority, Task},
    params::{AddTask, DEFAULT_DURATION, MAX_DURATION},
};

static PRIORITY_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)!(cao|thấp|thap|trungbinh|trung)").expect("valid regex"));
static SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*[-|]\s*").expect("valid regex"));
static HOURS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.?\d*)h").expect("valid regex"));
static MINUTES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)p?").expect("valid regex"));
static TWELVE_HOUR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+):?(\d+)?\s*(am|pm)").expect("valid regex"));
static TWENTY_FOUR_HOUR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+):?(\d+)?").expect("valid regex"));

/// Parses bulk text into task drafts, one per non-blank line.
///
/// Drafts may carry an empty title when a line holds only a marker or
/// separators; callers decide whether to keep them.
pub fn parse_tasks(text: &str) -> Vec<AddTask> {
    text.lines().filter_map(parse_task_line).collect()
}

/// Parses a single line. Returns `None` for blank lines only.
pub fn parse_task_line(line: &str) -> Option<AddTask> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut priority = Priority::Medium;
    let mut rest = trimmed.to_string();
    if let Some(captures) = PRIORITY_MARKER.captures(trimmed) {
        priority = match captures[1].to_lowercase().as_str() {
            "cao" => Priority::High,
            "thấp" | "thap" => Priority::Low,
            _ => Priority::Medium,
        };
        rest = PRIORITY_MARKER.replace(trimmed, "").trim().to_string();
    }

    let parts: Vec<&str> = SEPARATOR.split(&rest).map(str::trim).collect();

    let title = parts.first().copied().unwrap_or_default().to_string();
    let duration = parts
        .get(1)
        .and_then(|field| parse_duration(field))
        .unwrap_or(DEFAULT_DURATION);
    let fixed_time = parts.get(2).and_then(|field| parse_time(field));

    Some(AddTask {
        title,
        duration,
        priority,
        deadline: None,
        fixed_time,
    })
}

/// Parses `2h`, `1.5h`, `45p` or `45`. Zero, unreadable or longer-than-a-day
/// values yield `None`.
fn parse_duration(field: &str) -> Option<u32> {
    let field = field.to_lowercase();
    let minutes = if let Some(captures) = HOURS.captures(&field) {
        let hours: f64 = captures[1].parse().ok()?;
        let minutes = (hours * 60.0).round();
        if !(1.0..=f64::from(MAX_DURATION)).contains(&minutes) {
            return None;
        }
        minutes as u32
    } else {
        MINUTES.captures(&field)?[1].parse().ok()?
    };
    (1..=MAX_DURATION).contains(&minutes).then_some(minutes)
}

/// Parses `9am`, `3:30pm`, `15:00` or `9`. Out-of-range values yield `None`.
fn parse_time(field: &str) -> Option<ClockTime> {
    let field = field.trim().to_lowercase();

    if let Some(captures) = TWELVE_HOUR.captures(&field) {
        let mut hour: u32 = captures[1].parse().ok()?;
        if hour > 12 {
            return None;
        }
        let minute: u32 = match captures.get(2) {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };
        match &captures[3] {
            "pm" if hour != 12 => hour += 12,
            "am" if hour == 12 => hour = 0,
            _ => {}
        }
        return ClockTime::new(hour, minute).ok();
    }

    let captures = TWENTY_FOUR_HOUR.captures(&field)?;
    let hour: u32 = captures[1].parse().ok()?;
    let minute: u32 = match captures.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };
    ClockTime::new(hour, minute).ok()
}

/// Serializes tasks into the bulk-import format.
///
/// Durations that are whole hours are written as `<n>h`, everything else as
/// `<n>p`. Medium priority has no marker. Deadlines are not exported.
pub fn export_tasks(tasks: &[Task]) -> String {
    tasks.iter().map(export_task_line).collect::<Vec<_>>().join("\n")
}

fn export_task_line(task: &Task) -> String {
    let mut line = task.title.clone();

    if task.duration >= 60 && task.duration % 60 == 0 {
        line.push_str(&format!(" - {}h", task.duration / 60));
    } else {
        line.push_str(&format!(" - {}p", task.duration));
    }

    if let Some(fixed_time) = task.fixed_time {
        line.push_str(&format!(" - {fixed_time}"));
    }

    match task.priority {
        Priority::High => line.push_str(" !cao"),
        Priority::Low => line.push_str(" !thấp"),
        Priority::Medium => {}
    }

    line
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;

    fn task(title: &str, duration: u32, priority: Priority, fixed: Option<(u32, u32)>) -> Task {
        Task {
            id: 1,
            title: title.to_string(),
            duration,
            priority,
            deadline: None,
            fixed_time: fixed.map(|(h, m)| ClockTime::new(h, m).unwrap()),
            created_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_parse_full_line() {
        let draft = parse_task_line("Meeting với client - 60p - 9am !cao").unwrap();
        assert_eq!(draft.title, "Meeting với client");
        assert_eq!(draft.duration, 60);
        assert_eq!(draft.priority, Priority::High);
        assert_eq!(draft.fixed_time, Some(ClockTime::new(9, 0).unwrap()));
    }

    #[test]
    fn test_parse_title_only_uses_defaults() {
        let draft = parse_task_line("Read documentation").unwrap();
        assert_eq!(draft.title, "Read documentation");
        assert_eq!(draft.duration, DEFAULT_DURATION);
        assert_eq!(draft.priority, Priority::Medium);
        assert_eq!(draft.fixed_time, None);
    }

    #[test]
    fn test_parse_hours_and_fractional_hours() {
        assert_eq!(parse_task_line("Write report - 2h").unwrap().duration, 120);
        assert_eq!(parse_task_line("Deep work - 1.5h").unwrap().duration, 90);
        assert_eq!(parse_task_line("Inbox | 15").unwrap().duration, 15);
    }

    #[test]
    fn test_parse_twelve_hour_times() {
        let at = |line: &str| parse_task_line(line).unwrap().fixed_time.map(|t| t.to_string());
        assert_eq!(at("Review - 30p - 2pm"), Some("14:00".into()));
        assert_eq!(at("Lunch - 1h - 12pm"), Some("12:00".into()));
        assert_eq!(at("Night job - 1h - 12am"), Some("00:00".into()));
        assert_eq!(at("Call - 30p - 3:45 PM"), Some("15:45".into()));
        assert_eq!(at("Sync - 30p - 9:30"), Some("09:30".into()));
        assert_eq!(at("Standup - 15p - 9"), Some("09:00".into()));
    }

    #[test]
    fn test_priority_marker_is_position_independent() {
        let draft = parse_task_line("Research !thấp - 45p").unwrap();
        assert_eq!(draft.title, "Research");
        assert_eq!(draft.priority, Priority::Low);
        assert_eq!(draft.duration, 45);

        let draft = parse_task_line("Plan week - 30p !TRUNGBINH").unwrap();
        assert_eq!(draft.title, "Plan week");
        assert_eq!(draft.priority, Priority::Medium);
    }

    #[test]
    fn test_malformed_fields_fall_back_to_defaults() {
        let draft = parse_task_line("Odd task - soon - whenever").unwrap();
        assert_eq!(draft.title, "Odd task");
        assert_eq!(draft.duration, DEFAULT_DURATION);
        assert_eq!(draft.fixed_time, None);

        let draft = parse_task_line("Zero - 0p - 25:00").unwrap();
        assert_eq!(draft.duration, DEFAULT_DURATION);
        assert_eq!(draft.fixed_time, None);
    }

    #[test]
    fn test_oversized_fields_are_malformed() {
        let draft = parse_task_line("Job - 30p - 4294967290pm").unwrap();
        assert_eq!(draft.duration, 30);
        assert_eq!(draft.fixed_time, None);

        assert_eq!(parse_task_line("Job - 13pm").unwrap().fixed_time, None);
        assert_eq!(parse_task_line("Job - 99999999h").unwrap().duration, DEFAULT_DURATION);
        assert_eq!(parse_task_line("Job - 4294967295p").unwrap().duration, DEFAULT_DURATION);
        assert_eq!(parse_task_line("Job - 24h").unwrap().duration, MAX_DURATION);
        assert_eq!(parse_task_line("Job - 1441").unwrap().duration, DEFAULT_DURATION);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let drafts = parse_tasks("\nFirst - 10p\n   \nSecond\n");
        let titles: Vec<_> = drafts.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, ["First", "Second"]);
    }

    #[test]
    fn test_export_format() {
        let tasks = vec![
            task("Meeting", 60, Priority::High, Some((9, 0))),
            task("Report", 120, Priority::Medium, None),
            task("Research", 45, Priority::Low, None),
            task("Workout", 90, Priority::Medium, Some((18, 30))),
        ];
        assert_eq!(
            export_tasks(&tasks),
            "Meeting - 1h - 09:00 !cao\nReport - 2h\nResearch - 45p !thấp\nWorkout - 90p - 18:30"
        );
    }

    #[test]
    fn test_export_then_parse_round_trips() {
        let tasks = vec![
            task("Meeting with client", 60, Priority::High, Some((9, 0))),
            task("Write report", 120, Priority::Medium, None),
            task("Code review", 30, Priority::Medium, Some((14, 0))),
            task("Read docs", 45, Priority::Low, None),
            task("Evening run", 75, Priority::High, Some((18, 15))),
        ];

        let parsed = parse_tasks(&export_tasks(&tasks));
        let expected: Vec<AddTask> = tasks.iter().map(AddTask::from).collect();
        assert_eq!(parsed, expected);
    }
}
