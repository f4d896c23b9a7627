//! Custom error types and handling
//!
//! This module defines the application's error types and implements
//! conversion to HTTP responses for the Axum framework.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Resource errors
    #[error("Not found: {0}")]
    NotFound(String),

    // Relationship errors
    #[error("Forbidden: {0}")]
    Forbidden(String),

    // Lifecycle errors
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Room is full")]
    RoomFull,

    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    // External collaborator errors
    #[error("Unavailable: {0}")]
    Unavailable(String),

    #[error("Execution service error: {0}")]
    Transport(String),

    // Internal errors
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

/// Error details in response
#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

impl AppError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::InvalidState(_) => "INVALID_STATE",
            Self::RoomFull => "ROOM_FULL",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Unavailable(_) => "UNAVAILABLE",
            Self::Transport(_) => "EXECUTION_SERVICE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::InvalidState(_) | Self::RoomFull => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Transport(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) | Self::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Log internal errors but don't expose details to clients
        let message = match &self {
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                "An internal error occurred".to_string()
            }
            _ => self.to_string(),
        };

        let body = ErrorResponse {
            error: ErrorDetails {
                code: self.error_code().to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Transport(err.to_string())
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
