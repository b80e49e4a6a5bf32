//! Centralized error handling.
//!
//! Provides a unified error type for the entire application,
//! with automatic HTTP response conversion.

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication
    #[error("authentication required")]
    Unauthorized,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid or expired token")]
    InvalidToken,

    /// The token subject no longer maps to a stored user.
    #[error("invalid user")]
    UnknownUser,

    // Input
    #[error("invalid input")]
    InvalidInput(validator::ValidationErrors),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("user already exists")]
    DuplicateUser,

    // External service errors
    #[error("database error")]
    Database(#[from] sea_orm::DbErr),

    #[error("token signing failed")]
    Signing(#[from] jsonwebtoken::errors::Error),

    // Internal
    #[error("internal server error")]
    Internal(String),
}

/// Error response body: `{message, errors?}`
#[derive(Debug, Serialize)]
struct ErrorResponse {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<BTreeMap<String, Vec<String>>>,
}

impl AppError {
    /// Get HTTP status code
    fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::InvalidToken | AppError::UnknownUser => {
                StatusCode::UNAUTHORIZED
            }
            AppError::InvalidCredentials
            | AppError::InvalidInput(_)
            | AppError::Validation(_)
            | AppError::BadRequest(_)
            | AppError::DuplicateUser => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Signing(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get user-facing message (hides internal details)
    fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::BadRequest(msg) => msg.clone(),

            // Hide details for internal errors
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "internal server error".to_string()
            }
            AppError::Signing(e) => {
                tracing::error!("Token signing error: {:?}", e);
                "internal server error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "internal server error".to_string()
            }

            _ => self.to_string(),
        }
    }

    /// Field-level detail, present only for request validation failures.
    fn field_errors(&self) -> Option<BTreeMap<String, Vec<String>>> {
        let AppError::InvalidInput(errors) = self else {
            return None;
        };

        let fields = errors
            .field_errors()
            .iter()
            .map(|(field, errs)| {
                let messages = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("{} is invalid", field))
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();

        Some(fields)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            message: self.user_message(),
            errors: self.field_errors(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
