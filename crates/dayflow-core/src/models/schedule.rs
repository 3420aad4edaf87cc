//! Day plan and schedule item models.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use super::{ClockTime, Task};

/// Kind of block in a generated schedule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Work,
    Break,
    Buffer,
}

impl FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "work" => Ok(ItemKind::Work),
            "break" => Ok(ItemKind::Break),
            "buffer" => Ok(ItemKind::Buffer),
            _ => Err(format!("Invalid item kind: {s}")),
        }
    }
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Work => "work",
            ItemKind::Break => "break",
            ItemKind::Buffer => "buffer",
        }
    }
}

/// One block of a generated schedule.
///
/// Field names follow the wire shape requested from the model
/// (`time`, `taskTitle`, `type`, `duration`, `reason`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleItem {
    /// Start time of the block, e.g. `09:00`
    pub time: String,

    /// Task name, or a label such as "Break"
    pub task_title: String,

    #[serde(rename = "type")]
    pub kind: ItemKind,

    /// Duration in minutes
    #[serde(deserialize_with = "deserialize_minutes")]
    pub duration: u32,

    /// Why this slot was chosen
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ScheduleItem {
    /// Parsed start time, if the model produced a well-formed `HH:MM`.
    pub fn start(&self) -> Option<ClockTime> {
        self.time.parse().ok()
    }
}

// The model is asked for a JSON number, which may arrive as `60.0`.
fn deserialize_minutes<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() || value < 0.0 {
        return Err(serde::de::Error::custom(format!(
            "duration must be a non-negative number, got {value}"
        )));
    }
    Ok(value.round() as u32)
}

/// Named part of the day a schedule item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    Morning,
    Afternoon,
    Evening,
}

impl Segment {
    pub const ALL: [Segment; 3] = [Segment::Morning, Segment::Afternoon, Segment::Evening];

    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::Morning => "morning",
            Segment::Afternoon => "afternoon",
            Segment::Evening => "evening",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Segment::Morning => "Morning",
            Segment::Afternoon => "Afternoon",
            Segment::Evening => "Evening",
        }
    }
}

impl FromStr for Segment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "morning" | "am" => Ok(Segment::Morning),
            "afternoon" | "pm" => Ok(Segment::Afternoon),
            "evening" | "night" => Ok(Segment::Evening),
            _ => Err(format!("Invalid segment: {s}")),
        }
    }
}

/// A generated schedule for one day.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DayPlan {
    #[serde(default)]
    pub morning: Vec<ScheduleItem>,
    #[serde(default)]
    pub afternoon: Vec<ScheduleItem>,
    #[serde(default)]
    pub evening: Vec<ScheduleItem>,
    #[serde(default)]
    pub tips: Vec<String>,
}

/// The schedule item in progress at a given time.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentItem<'a> {
    pub segment: Segment,
    pub item: &'a ScheduleItem,
    /// Minutes left until the item ends
    pub remaining: u32,
    /// Elapsed share of the item, 0-100
    pub progress: u32,
}

impl DayPlan {
    pub fn segment(&self, segment: Segment) -> &[ScheduleItem] {
        match segment {
            Segment::Morning => &self.morning,
            Segment::Afternoon => &self.afternoon,
            Segment::Evening => &self.evening,
        }
    }

    pub fn segment_mut(&mut self, segment: Segment) -> &mut Vec<ScheduleItem> {
        match segment {
            Segment::Morning => &mut self.morning,
            Segment::Afternoon => &mut self.afternoon,
            Segment::Evening => &mut self.evening,
        }
    }

    /// Iterates over every item in day order, tagged with its segment.
    pub fn items(&self) -> impl Iterator<Item = (Segment, &ScheduleItem)> {
        Segment::ALL
            .into_iter()
            .flat_map(move |segment| self.segment(segment).iter().map(move |item| (segment, item)))
    }

    pub fn item_count(&self) -> usize {
        self.morning.len() + self.afternoon.len() + self.evening.len()
    }

    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }

    /// Finds the first item whose `[start, start + duration)` window contains
    /// `now`. Items with an unparseable start time or zero duration are skipped.
    pub fn current_item(&self, now: ClockTime) -> Option<CurrentItem<'_>> {
        let now = now.minutes_since_midnight();
        self.items().find_map(|(segment, item)| {
            let start = item.start()?.minutes_since_midnight();
            let end = start.saturating_add(item.duration);
            if item.duration == 0 || now < start || now >= end {
                return None;
            }
            let remaining = end - now;
            let elapsed = item.duration - remaining;
            let progress = (f64::from(elapsed) / f64::from(item.duration) * 100.0).round() as u32;
            Some(CurrentItem {
                segment,
                item,
                remaining,
                progress,
            })
        })
    }
}

/// Warning raised when the tasks need more time than is left in the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBudget {
    /// Total task minutes
    pub needed: u32,
    /// Whole minutes left until 23:59:59.999
    pub available: u32,
}

impl TimeBudget {
    const END_OF_DAY_MS: i64 = 86_399_999;

    /// Compares the total task duration with the time left after `now`.
    ///
    /// Returns `None` when the tasks fit, or when no time is left at all.
    pub fn check(tasks: &[Task], now: jiff::civil::Time) -> Option<Self> {
        let needed = tasks
            .iter()
            .fold(0u32, |total, task| total.saturating_add(task.duration));
        let now_ms = ((i64::from(now.hour()) * 60 + i64::from(now.minute())) * 60
            + i64::from(now.second()))
            * 1000
            + i64::from(now.millisecond());
        let available = ((Self::END_OF_DAY_MS - now_ms) / 60_000).max(0) as u32;

        (available > 0 && needed > available).then_some(Self { needed, available })
    }
}
