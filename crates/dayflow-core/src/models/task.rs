//! Task model definition and related value types.

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{PlannerError, Result};

/// Represents a task waiting to be scheduled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Unique identifier for the task
    pub id: u64,

    /// Short title of the task
    pub title: String,

    /// Estimated duration in minutes
    pub duration: u32,

    /// Scheduling priority
    #[serde(default)]
    pub priority: Priority,

    /// Time of day by which the task should be finished
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<ClockTime>,

    /// Mandatory start time; the scheduler must not move the task
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_time: Option<ClockTime>,

    /// Timestamp when the task was created (UTC)
    pub created_at: Timestamp,
}

impl Task {
    /// Whether the task is pinned to an exact start time.
    pub fn is_fixed(&self) -> bool {
        self.fixed_time.is_some()
    }
}

/// Type-safe enumeration of task priorities.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" | "h" | "cao" => Ok(Priority::High),
            "medium" | "m" | "trung" | "trungbinh" | "trung bình" => Ok(Priority::Medium),
            "low" | "l" | "thấp" | "thap" => Ok(Priority::Low),
            _ => Err(format!("Invalid priority: {s}")),
        }
    }
}

impl Priority {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Capitalized label used in prompts and terminal output.
    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

/// A wall-clock time of day with minute precision.
///
/// Serialized as the zero-padded string `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    /// Creates a time of day, rejecting hours above 23 or minutes above 59.
    pub fn new(hour: u32, minute: u32) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(PlannerError::invalid_input("time")
                .with_reason(format!("{hour}:{minute:02} is not a valid time of day")));
        }
        Ok(Self {
            hour: hour as u8,
            minute: minute as u8,
        })
    }

    pub fn hour(&self) -> u32 {
        u32::from(self.hour)
    }

    pub fn minute(&self) -> u32 {
        u32::from(self.minute)
    }

    /// Minutes elapsed since midnight.
    pub fn minutes_since_midnight(&self) -> u32 {
        self.hour() * 60 + self.minute()
    }

    /// Truncates a civil time to minute precision.
    pub fn from_civil(time: jiff::civil::Time) -> Self {
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }

    /// Current local time of day.
    pub fn now() -> Self {
        Self::from_civil(jiff::Zoned::now().time())
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ClockTime {
    type Err = PlannerError;

    /// Parses `H:MM` or `HH:MM`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || {
            PlannerError::invalid_input("time").with_reason(format!("expected HH:MM, got '{s}'"))
        };
        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
            return Err(invalid());
        }
        let hour = hour.parse::<u32>().map_err(|_| invalid())?;
        let minute = minute.parse::<u32>().map_err(|_| invalid())?;
        Self::new(hour, minute)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
