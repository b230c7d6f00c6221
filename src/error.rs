//! Application error type and its HTTP representation.
//!
//! Every fallible path in the shortening and resolution core returns
//! [`AppError`]. Each variant carries a human-readable message and a JSON
//! `details` payload that is echoed back to API clients.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error description returned to API clients.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Errors surfaced by the shortening and resolution services.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed request input (e.g. a target that is not an http(s) URL).
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// A custom short code that violates the length or charset rules.
    #[error("{message}")]
    InvalidCode { message: String, details: Value },

    /// The short code is already assigned.
    #[error("{message}")]
    CodeConflict { message: String, details: Value },

    /// No record exists for the requested short code.
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// No free code could be generated within the attempt bound.
    #[error("{message}")]
    GenerationExhausted { message: String, details: Value },

    /// Transport or I/O failure talking to the record store.
    #[error("{message}")]
    Storage { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn invalid_code(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidCode {
            message: message.into(),
            details,
        }
    }

    pub fn code_conflict(message: impl Into<String>, details: Value) -> Self {
        Self::CodeConflict {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn generation_exhausted(message: impl Into<String>, details: Value) -> Self {
        Self::GenerationExhausted {
            message: message.into(),
            details,
        }
    }

    pub fn storage(message: impl Into<String>, details: Value) -> Self {
        Self::Storage {
            message: message.into(),
            details,
        }
    }

    /// Stable machine-readable identifier for the error kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "validation_error",
            AppError::InvalidCode { .. } => "invalid_code",
            AppError::CodeConflict { .. } => "code_conflict",
            AppError::NotFound { .. } => "not_found",
            AppError::GenerationExhausted { .. } => "generation_exhausted",
            AppError::Storage { .. } => "storage_error",
        }
    }

    /// HTTP status the error maps to at the API boundary.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::InvalidCode { .. } => StatusCode::BAD_REQUEST,
            AppError::CodeConflict { .. } => StatusCode::CONFLICT,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::GenerationExhausted { .. } | AppError::Storage { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns true for conflicts on the short code uniqueness constraint.
    pub fn is_code_conflict(&self) -> bool {
        matches!(self, AppError::CodeConflict { .. })
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        let (message, details) = match self {
            AppError::Validation { message, details }
            | AppError::InvalidCode { message, details }
            | AppError::CodeConflict { message, details }
            | AppError::NotFound { message, details }
            | AppError::GenerationExhausted { message, details }
            | AppError::Storage { message, details } => (message.clone(), details.clone()),
        };

        ErrorInfo {
            code: self.error_code(),
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "{}", self);
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        map_sqlx_error(e)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::bad_request("Request validation failed", json!({ "reason": e.to_string() }))
    }
}

/// Maps a database error onto the application taxonomy.
///
/// Unique constraint violations become [`AppError::CodeConflict`]; everything
/// else is a [`AppError::Storage`] failure.
pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    if let Some(db) = e.as_database_error()
        && db.is_unique_violation()
    {
        return AppError::code_conflict(
            "Shortcode already exists",
            json!({ "constraint": db.constraint() }),
        );
    }

    tracing::error!(error = %e, "Database error");
    AppError::storage("Database error", json!({}))
}
