use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sqlx::error::ErrorKind;
use thiserror::Error;

use crate::reports::validation::{FieldError, ValidationError};
use crate::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(ValidationError::single("body", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(ValidationError::single("query", rejection.body_text()))
    }
}

fn store_error_parts(err: &StoreError) -> (StatusCode, &'static str, String) {
    match err {
        StoreError::Upstream { status, message } => (
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
            "UPSTREAM_ERROR",
            message.clone(),
        ),
        StoreError::Http(e) if e.is_timeout() => {
            tracing::error!("Store request timed out: {e}");
            (
                StatusCode::GATEWAY_TIMEOUT,
                "UPSTREAM_TIMEOUT",
                "The report store did not answer in time".to_string(),
            )
        }
        StoreError::Http(e) => {
            tracing::error!("Store request failed: {e}");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_UNAVAILABLE",
                format!("The report store could not be reached: {e}"),
            )
        }
        StoreError::Decode(msg) => {
            tracing::error!("Store response could not be decoded: {msg}");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                format!("Unexpected response from the report store: {msg}"),
            )
        }
        StoreError::Database(e) => match e.as_database_error() {
            Some(db)
                if matches!(
                    db.kind(),
                    ErrorKind::UniqueViolation
                        | ErrorKind::ForeignKeyViolation
                        | ErrorKind::CheckViolation
                        | ErrorKind::NotNullViolation
                ) =>
            {
                (StatusCode::CONFLICT, "CONSTRAINT_VIOLATION", db.message().to_string())
            }
            _ => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
        },
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut fields: Option<&[FieldError]> = None;

        let (status, code, message) = match &self {
            AppError::Validation(err) => {
                fields = Some(err.fields.as_slice());
                (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    err.to_string(),
                )
            }
            AppError::Store(err) => store_error_parts(err),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(fields) = fields {
            error["fields"] = json!(fields);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
