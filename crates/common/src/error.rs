//! Error types for yoake.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Client Errors ===
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No such user: {0}")]
    UserNotFound(String),

    #[error("No such file: {0}")]
    FileNotFound(String),

    #[error("No such emoji: {0}")]
    EmojiNotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),

    #[error("Duplicate name: {0}")]
    DuplicateName(String),

    // === Server Errors ===
    #[error("Database error: {0}")]
    Database(String),

    #[error("Failed to resolve remote user: {0}")]
    RemoteResolution(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            // 4xx Client Errors
            Self::NotFound(_)
            | Self::UserNotFound(_)
            | Self::FileNotFound(_)
            | Self::EmojiNotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_)
            | Self::Validation(_)
            | Self::InvalidCursor(_)
            | Self::DuplicateName(_) => StatusCode::BAD_REQUEST,

            // 5xx Server Errors
            Self::Database(_)
            | Self::RemoteResolution(_)
            | Self::Config(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::UserNotFound(_) => "NO_SUCH_USER",
            Self::FileNotFound(_) => "NO_SUCH_FILE",
            Self::EmojiNotFound(_) => "NO_SUCH_EMOJI",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidCursor(_) => "INVALID_CURSOR",
            Self::DuplicateName(_) => "DUPLICATE_NAME",
            Self::Database(_) => "DATABASE_ERROR",
            Self::RemoteResolution(_) => "FAILED_TO_RESOLVE_REMOTE_USER",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether this error should be logged at error level.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        if self.is_server_error() {
            tracing::error!(error = %self, code = code, "Server error occurred");
        } else {
            tracing::debug!(error = %self, code = code, "Client error occurred");
        }

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

// === From implementations ===

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_4xx() {
        assert_eq!(
            AppError::InvalidCursor("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::DuplicateName("blob".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::FileNotFound("f".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Forbidden("hidden".into()).status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_remote_resolution_is_server_error() {
        let err = AppError::RemoteResolution("alice@remote.example".into());
        assert!(err.is_server_error());
        assert_eq!(err.error_code(), "FAILED_TO_RESOLVE_REMOTE_USER");
    }

    #[test]
    fn test_error_codes_match_api_names() {
        assert_eq!(AppError::UserNotFound("u".into()).error_code(), "NO_SUCH_USER");
        assert_eq!(AppError::EmojiNotFound("e".into()).error_code(), "NO_SUCH_EMOJI");
        assert_eq!(AppError::DuplicateName("n".into()).error_code(), "DUPLICATE_NAME");
    }
}
