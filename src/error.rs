use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Invalid input: {} field error(s)", .0.len())]
    InvalidFields(Vec<FieldError>),
    #[error("Internal server error")]
    Internal,
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Database(e) if is_unique_violation(e) => StatusCode::CONFLICT,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) | AppError::InvalidFields(_) => StatusCode::BAD_REQUEST,
            AppError::Internal | AppError::InternalWithMsg(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// 2067 = SQLite unique constraint, 1555 = SQLite primary key
// 23505 = PostgreSQL unique violation
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .and_then(|db_err| db_err.code())
        .map(|code| code == "2067" || code == "1555" || code == "23505")
        .unwrap_or(false)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            AppError::Database(e) => {
                if is_unique_violation(&e) {
                    json!({ "message": "Resource already exists (duplicate entry)" })
                } else {
                    error!("Database error: {:?}", e);
                    json!({ "message": "Internal server error" })
                }
            }
            AppError::NotFound(msg)
            | AppError::Forbidden(msg)
            | AppError::Conflict(msg)
            | AppError::Validation(msg) => json!({ "message": msg }),
            AppError::Unauthorized => json!({ "message": "Unauthorized" }),
            AppError::InvalidFields(errors) => json!({
                "message": "Validation failed",
                "errors": errors,
            }),
            AppError::Internal => json!({ "message": "Internal error" }),
            AppError::InternalWithMsg(msg) => {
                error!("Internal error: {}", msg);
                json!({ "message": "Internal error" })
            }
        };

        (status, Json(body)).into_response()
    }
}
