//! Error type system for Staffdesk
//!
//! Every handler returns `Result<_, StaffdeskError>`; the `IntoResponse`
//! impl maps each variant to an HTTP status and a JSON body with a
//! `message` field, so no failure ever propagates to the client unmapped.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Main error type for the Staffdesk system
#[derive(Debug, thiserror::Error)]
pub enum StaffdeskError {
    // System-level errors
    #[error("System initialization failed: {0}")]
    InitializationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    // API-related errors
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // I/O errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    // Background task errors
    #[error("Task error: {0}")]
    TaskError(String),
}

impl StaffdeskError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            StaffdeskError::ValidationError(_) => StatusCode::BAD_REQUEST,

            StaffdeskError::AuthError(_) => StatusCode::UNAUTHORIZED,

            StaffdeskError::NotFound(_) => StatusCode::NOT_FOUND,

            StaffdeskError::Conflict(_) => StatusCode::CONFLICT,

            StaffdeskError::InitializationError(_)
            | StaffdeskError::ConfigError(_)
            | StaffdeskError::DatabaseError(_)
            | StaffdeskError::IoError(_)
            | StaffdeskError::TaskError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type name for API responses
    pub fn error_type(&self) -> &'static str {
        match self {
            StaffdeskError::InitializationError(_) => "InitializationError",
            StaffdeskError::ConfigError(_) => "ConfigError",
            StaffdeskError::DatabaseError(_) => "DatabaseError",
            StaffdeskError::ValidationError(_) => "ValidationError",
            StaffdeskError::AuthError(_) => "AuthError",
            StaffdeskError::NotFound(_) => "NotFoundError",
            StaffdeskError::Conflict(_) => "ConflictError",
            StaffdeskError::IoError(_) => "IoError",
            StaffdeskError::TaskError(_) => "TaskError",
        }
    }

    /// Check whether this error carries internal detail that must not
    /// reach the client
    pub fn is_internal(&self) -> bool {
        self.status_code() == StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Error response structure for API endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error type identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Unique trace ID for this error
    pub trace_id: String,
}

impl ErrorResponse {
    /// Create a new error response with a generated trace ID
    pub fn new(error: String, message: String) -> Self {
        Self {
            error,
            message,
            trace_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an error response from a StaffdeskError
    ///
    /// Internal errors (500) are collapsed to a generic message so store
    /// and filesystem details never leak to the client.
    pub fn from_error(error: &StaffdeskError) -> Self {
        let message = if error.is_internal() {
            "Server error".to_string()
        } else {
            error.to_string()
        };
        Self::new(error.error_type().to_string(), message)
    }
}

/// Implement IntoResponse for StaffdeskError to enable automatic error
/// handling in Axum
impl IntoResponse for StaffdeskError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let error_response = ErrorResponse::from_error(&self);

        tracing::error!(
            error_type = self.error_type(),
            trace_id = %error_response.trace_id,
            status_code = %status_code,
            "Request failed: {}",
            self
        );

        (status_code, Json(error_response)).into_response()
    }
}

/// Result type alias for operations that can fail with StaffdeskError
pub type Result<T> = std::result::Result<T, StaffdeskError>;

/// Context extension trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            StaffdeskError::InitializationError(format!("{}: {}", context.into(), e))
        })
    }
}
