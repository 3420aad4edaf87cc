//! Error types for the relay.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by relay handlers and startup.
///
/// Every variant renders as an OAuth-style `{error, error_description}` body.
#[derive(Error, Debug)]
pub enum RelayError {
    /// A required parameter, cookie or header was missing or unusable
    #[error("invalid_request: {0}")]
    InvalidRequest(String),

    /// Missing or malformed bearer token
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The provider answered with an error; status and code pass through
    #[error("provider error {status}: {error} ({description})")]
    Provider {
        status: StatusCode,
        error: String,
        description: String,
    },

    /// The provider could not be reached or sent an unreadable body
    #[error("upstream failure: {0}")]
    Upstream(String),

    /// Startup configuration is missing or invalid
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    error_description: &'a str,
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Provider { status, .. } => *status,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Configuration(_) | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, description) = match &self {
            Self::InvalidRequest(message) => ("invalid_request", message.clone()),
            Self::Unauthorized(message) => ("unauthorized", message.clone()),
            Self::Provider {
                error, description, ..
            } => (error.as_str(), description.clone()),
            Self::Upstream(message) | Self::Configuration(message) => {
                ("server_error", message.clone())
            }
            Self::Io(e) => ("server_error", e.to_string()),
        };

        if status.is_server_error() || matches!(self, Self::Provider { .. }) {
            error!("{self}");
        }

        let body = ErrorBody {
            error: code,
            error_description: &description,
        };
        (status, Json(body)).into_response()
    }
}

/// Type alias for relay results.
pub type Result<T> = std::result::Result<T, RelayError>;
