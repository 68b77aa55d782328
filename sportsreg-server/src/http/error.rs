//! API error types with IntoResponse
//!
//! Errors are converted to JSON `{error, message}` bodies with the
//! matching status code. Server-side failures are logged and replaced by a
//! generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::auth::AuthError;
use crate::db::repos::DbError;
use crate::models::ValidationError;

const INTERNAL_MESSAGE: &str = "an internal error occurred";

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Input failed validation (400)
    Validation(ValidationError),

    /// Request conflicts with a business rule (400)
    BadRequest { message: String },

    /// Missing or invalid credentials (401)
    Unauthorized { message: String },

    /// Authenticated but not allowed (403)
    Forbidden { reason: String },

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Database error (500, logged)
    Database(DbError),

    /// Internal error (500, logged)
    Internal { message: String },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (kind, message) = match self {
            Self::Validation(e) => ("validation_error", e.to_string()),
            Self::BadRequest { message } => ("bad_request", message),
            Self::Unauthorized { message } => ("unauthorized", message),
            Self::Forbidden { reason } => ("forbidden", reason),
            Self::NotFound { resource, id } => {
                tracing::debug!(resource, %id, "not found");
                ("not_found", format!("{} not found", resource))
            }
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!("Database error: {}", e);
                ("internal_error", INTERNAL_MESSAGE.to_string())
            }
            Self::Internal { message } => {
                tracing::error!("Internal error: {}", message);
                ("internal_error", INTERNAL_MESSAGE.to_string())
            }
        };

        let body = json!({
            "error": kind,
            "message": message
        });

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            _ => Self::Database(e),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Hash(message) => Self::Internal { message },
            AuthError::Token(_) | AuthError::Expired => Self::Unauthorized {
                message: "Token is not valid".into(),
            },
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Internal {
            message: format!("blocking task failed: {}", e),
        }
    }
}
