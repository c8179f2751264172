//! services/api/src/error.rs
//!
//! Defines the error types for the API service: `ApiError` for startup and
//! `WebError` for failures inside a single request.

use axum::{
    extract::rejection::FormRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::config::ConfigError;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A request-level failure, rendered as a plain-text body with its status code.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// No session, or the session expired.
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    /// Password mismatch at login.
    #[error("{0}")]
    InvalidCredentials(String),

    /// Duplicate email at signup.
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    /// Store, hashing or filesystem failure.
    #[error("{0}")]
    Internal(String),
}

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            WebError::NotFound(_) => StatusCode::NOT_FOUND,
            WebError::InvalidCredentials(_)
            | WebError::Conflict(_)
            | WebError::Validation(_) => StatusCode::BAD_REQUEST,
            WebError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Maps an unreadable form body (wrong content type, missing field) to a
    /// `Validation` error carrying the handler's own failure message.
    pub fn rejected_form(rejection: FormRejection, message: &str) -> Self {
        debug!(status = %rejection.status(), "Rejected form body: {}", rejection.body_text());
        WebError::Validation(message.to_string())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
