//! services/api/src/error.rs
//!
//! Defines the startup error type for the API service and the mapping from
//! port errors to HTTP responses.

use crate::config::ConfigError;
use axum::{
    extract::rejection::{JsonRejection, StringRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use quickcards_core::ports::PortError;
use serde_json::json;
use tracing::{error, warn};

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration Error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

/// A `PortError` on its way out of a handler, rendered as `{"error": "..."}`.
#[derive(Debug)]
pub struct HttpError(pub PortError);

impl From<PortError> for HttpError {
    fn from(e: PortError) -> Self {
        Self(e)
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        Self(PortError::InvalidInput(rejection.body_text()))
    }
}

impl From<StringRejection> for HttpError {
    fn from(rejection: StringRejection) -> Self {
        Self(PortError::InvalidInput(rejection.body_text()))
    }
}

impl HttpError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            PortError::Upstream(_) | PortError::Format(_) => StatusCode::BAD_GATEWAY,
            PortError::DuplicateName(_) | PortError::EmailTaken(_) => StatusCode::CONFLICT,
            PortError::AuthRequired | PortError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            PortError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            PortError::NotFound(_) => StatusCode::NOT_FOUND,
            PortError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Internal details stay in the log.
        let message = if status.is_server_error() {
            error!("Request failed: {}", self.0);
            match self.0 {
                PortError::Unexpected(_) => "An internal error occurred".to_string(),
                ref other => other.to_string(),
            }
        } else {
            warn!("Request rejected: {}", self.0);
            self.0.to_string()
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_errors_map_to_statuses() {
        let cases = [
            (PortError::Upstream("down".into()), StatusCode::BAD_GATEWAY),
            (PortError::Format("not json".into()), StatusCode::BAD_GATEWAY),
            (PortError::DuplicateName("Biology".into()), StatusCode::CONFLICT),
            (PortError::EmailTaken("a@b.c".into()), StatusCode::CONFLICT),
            (PortError::AuthRequired, StatusCode::UNAUTHORIZED),
            (PortError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (PortError::InvalidInput("empty".into()), StatusCode::BAD_REQUEST),
            (PortError::NotFound("deck".into()), StatusCode::NOT_FOUND),
            (PortError::Unexpected("db".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(HttpError(err).status(), expected);
        }
    }
}
