//! Error types for the planner library.

use std::path::PathBuf;

use thiserror::Error;

/// Comprehensive error type for all planner operations.
#[derive(Error, Debug)]
pub enum PlannerError {
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Task not found for the given ID
    #[error("Task with ID {id} not found")]
    TaskNotFound { id: u64 },
    /// History entry not found for the given ID
    #[error("History entry with ID {id} not found")]
    HistoryNotFound { id: u64 },
    /// No day plan has been generated yet
    #[error("No day plan available; generate one first")]
    PlanNotFound,
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
    /// No API credential has been configured
    #[error("API key not found. Add your Gemini API key with `dayflow config set-key`")]
    CredentialMissing,
    /// The configured API credential was rejected
    #[error("API key is invalid: {reason}")]
    CredentialInvalid { reason: String },
    /// Any other schedule generation failure (transport, quota, parse)
    #[error("Schedule generation failed: {message}")]
    Generation { message: String },
    /// Remote sync failures
    #[error("Sync error: {message}")]
    Sync { message: String },
}

/// Coarse classification of a failed generation, used by front ends to decide
/// whether to reopen the credential setup flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    CredentialMissing,
    CredentialInvalid,
    GenericFailure,
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> PlannerError {
        PlannerError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> PlannerError {
        PlannerError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl PlannerError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Creates a generation error from any displayable message.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    /// Classifies this error for the credential-setup decision.
    ///
    /// The kind is fixed where the error is raised; nothing here inspects
    /// message text.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::CredentialMissing => FailureKind::CredentialMissing,
            Self::CredentialInvalid { .. } => FailureKind::CredentialInvalid,
            _ => FailureKind::GenericFailure,
        }
    }

    /// Returns true when the user should be sent back to credential setup.
    pub fn needs_credential_setup(&self) -> bool {
        self.failure_kind() != FailureKind::GenericFailure
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| PlannerError::database(message).with_source(e))
    }
}

/// Result type alias for planner operations
pub type Result<T> = std::result::Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kind_classification() {
        assert_eq!(
            PlannerError::CredentialMissing.failure_kind(),
            FailureKind::CredentialMissing
        );
        assert_eq!(
            PlannerError::CredentialInvalid {
                reason: "rejected".into()
            }
            .failure_kind(),
            FailureKind::CredentialInvalid
        );
        // Message text mentioning the key does not change the kind.
        assert_eq!(
            PlannerError::generation("API Key quota exceeded").failure_kind(),
            FailureKind::GenericFailure
        );
    }

    #[test]
    fn test_needs_credential_setup() {
        assert!(PlannerError::CredentialMissing.needs_credential_setup());
        assert!(!PlannerError::PlanNotFound.needs_credential_setup());
    }

    #[test]
    fn test_invalid_input_builder() {
        let err = PlannerError::invalid_input("title").with_reason("must not be empty");
        assert_eq!(
            err.to_string(),
            "Invalid input for field 'title': must not be empty"
        );
    }
}
