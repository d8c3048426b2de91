/// Unified error types for Orbit Desk
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the dashboard core
#[derive(Error, Debug)]
pub enum DeskError {
    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Non-success HTTP status from a provider
    #[error("Provider returned status {status}: {body}")]
    RemoteFetch { status: u16, body: String },

    /// Timestamp or structured-field shape mismatch in provider data
    #[error("Parse error: {0}")]
    Parse(String),

    /// Language-model output not parseable as the expected structure
    #[error("Generation error: {0}")]
    Generation(String),

    /// Duplicate photo title for the same owner
    #[error("Conflict: {0}")]
    Conflict(String),

    /// No stored token for the requested provider
    #[error("No stored credential: {0}")]
    CredentialMissing(String),

    /// Authentication errors (missing/invalid identity from the session layer)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Object storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// JSON error response envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Convert DeskError to HTTP response
impl IntoResponse for DeskError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            DeskError::Authentication(_) => (
                StatusCode::UNAUTHORIZED,
                "AuthenticationRequired",
                self.to_string(),
            ),
            DeskError::CredentialMissing(_) => (
                StatusCode::BAD_REQUEST,
                "ProviderNotConnected",
                self.to_string(),
            ),
            DeskError::Validation(_) => (
                StatusCode::BAD_REQUEST,
                "InvalidRequest",
                self.to_string(),
            ),
            DeskError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                "NotFound",
                self.to_string(),
            ),
            DeskError::Conflict(_) => (
                StatusCode::CONFLICT,
                "Conflict",
                self.to_string(),
            ),
            DeskError::RemoteFetch { .. } => (
                StatusCode::BAD_GATEWAY,
                "RemoteFetchFailed",
                self.to_string(),
            ),
            DeskError::Parse(_) => (
                StatusCode::BAD_GATEWAY,
                "ProviderDataInvalid",
                self.to_string(),
            ),
            DeskError::Generation(_) => (
                StatusCode::BAD_GATEWAY,
                "GenerationFailed",
                self.to_string(),
            ),
            DeskError::Database(_) | DeskError::Internal(_) | DeskError::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "InternalServerError",
                "Internal server error".to_string(), // Don't leak details
            ),
            DeskError::Storage(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "StorageError",
                self.to_string(),
            ),
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for dashboard operations
pub type DeskResult<T> = Result<T, DeskError>;
