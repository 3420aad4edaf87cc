//! Status and confirmation message types for operation feedback.

use std::fmt;

/// Severity of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Success,
    Warning,
    Failure,
}

/// Wrapper type for displaying operation confirmation messages.
pub struct OperationStatus {
    pub message: String,
    pub level: StatusLevel,
}

impl OperationStatus {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: StatusLevel::Success,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: StatusLevel::Warning,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: StatusLevel::Failure,
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.level {
            StatusLevel::Success => "Success:",
            StatusLevel::Warning => "**Warning:**",
            StatusLevel::Failure => "Error:",
        };
        writeln!(f, "{label} {}", self.message)
    }
}
