//! Error handling for the Kitchen Costing Platform
//!
//! Every failure leaving the API is rendered as
//! `{ "error": { "code", "message", "field" } }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::CostingError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    // Validation errors
    #[error("Validation error on {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Conflict: {message}")]
    Conflict { resource: String, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Costing errors
    #[error("Division by zero: {0}")]
    DivisionByZero(String),

    #[error("Arithmetic overflow: {0}")]
    Overflow(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn conflict(resource: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Conflict {
            resource: resource.into(),
            message: message.into(),
        }
    }

    fn status_and_detail(&self) -> (StatusCode, ErrorDetail) {
        match self {
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail::new("INVALID_CREDENTIALS", "Invalid email or password"),
            ),
            AppError::InsufficientPermissions => (
                StatusCode::FORBIDDEN,
                ErrorDetail::new(
                    "INSUFFICIENT_PERMISSIONS",
                    "You do not have permission to perform this action",
                ),
            ),
            AppError::Unauthorized(message) => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail::new("UNAUTHORIZED", message.clone()),
            ),
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail::new("VALIDATION_ERROR", message.clone()).with_field(field.clone()),
            ),
            AppError::ValidationError(message) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail::new("VALIDATION_ERROR", message.clone()),
            ),
            AppError::DuplicateEntry(field) => (
                StatusCode::CONFLICT,
                ErrorDetail::new(
                    "DUPLICATE_ENTRY",
                    format!("A record with this {} already exists", field),
                )
                .with_field(field.clone()),
            ),
            AppError::Conflict { resource, message } => (
                StatusCode::CONFLICT,
                ErrorDetail::new("CONFLICT", message.clone()).with_field(resource.clone()),
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail::new("NOT_FOUND", format!("{} not found", resource)),
            ),
            AppError::DivisionByZero(field) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail::new(
                    "DIVISION_BY_ZERO",
                    format!("{} must be greater than zero", field),
                )
                .with_field(field.clone()),
            ),
            AppError::Overflow(operation) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new(
                    "ARITHMETIC_OVERFLOW",
                    format!("Arithmetic overflow while computing {}", operation),
                ),
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("DATABASE_ERROR", "A database error occurred"),
            ),
            AppError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("INTERNAL_ERROR", message.clone()),
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("INTERNAL_ERROR", "An internal server error occurred"),
            ),
        }
    }
}

/// Error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorDetail {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            field: None,
        }
    }

    pub fn with_field(mut self, field: String) -> Self {
        self.field = Some(field);
        self
    }
}

impl From<CostingError> for AppError {
    fn from(err: CostingError) -> Self {
        match err {
            CostingError::Validation { field, message } => AppError::Validation { field, message },
            CostingError::NotFound { entity, id } => {
                AppError::NotFound(format!("{} {}", entity, id))
            }
            CostingError::DivisionByZero { field } => AppError::DivisionByZero(field.to_string()),
            CostingError::Overflow { operation } => AppError::Overflow(operation.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        // Report the first failing field; schema-level checks live under `__all__`
        let first = errors.field_errors().into_iter().next().and_then(|(field, list)| {
            list.first().map(|e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("invalid value ({})", e.code));
                (field.to_string(), message)
            })
        });

        match first {
            Some((field, message)) => AppError::Validation { field, message },
            None => AppError::ValidationError(errors.to_string()),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        // 23505 unique_violation, 23503 foreign_key_violation
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                Some("23505") => {
                    let constraint = db_err.constraint().unwrap_or("value").to_string();
                    return AppError::DuplicateEntry(constraint);
                }
                Some("23503") => {
                    let constraint = db_err.constraint().unwrap_or("reference").to_string();
                    return AppError::conflict(
                        constraint,
                        "The record is still referenced by another record",
                    );
                }
                _ => {}
            }
        }
        AppError::DatabaseError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = self.status_and_detail();

        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::warn!("Request rejected: {}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_costing_errors_map_to_statuses() {
        let cases = [
            (CostingError::validation("qty_g", "must not be negative"), StatusCode::BAD_REQUEST),
            (CostingError::item_not_found(Uuid::nil()), StatusCode::NOT_FOUND),
            (
                CostingError::DivisionByZero { field: "yield_qty_g" },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                CostingError::Overflow { operation: "total" },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let (status, _) = AppError::from(err).status_and_detail();
            assert_eq!(status, expected);
        }
    }

    #[test]
    fn test_division_by_zero_names_field() {
        let err = AppError::from(CostingError::DivisionByZero { field: "yield_qty_g" });
        let (_, detail) = err.status_and_detail();
        assert_eq!(detail.code, "DIVISION_BY_ZERO");
        assert_eq!(detail.field.as_deref(), Some("yield_qty_g"));
    }

    #[test]
    fn test_validation_errors_report_first_field() {
        let mut errors = validator::ValidationErrors::new();
        let mut error = validator::ValidationError::new("positive");
        error.message = Some("Quantity must be greater than zero".into());
        errors.add("yield_qty_g", error);

        match AppError::from(errors) {
            AppError::Validation { field, message } => {
                assert_eq!(field, "yield_qty_g");
                assert_eq!(message, "Quantity must be greater than zero");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
