//! Application error types for robust error handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error;

/// Field-scoped validation messages, serialized as `{"field": "message"}`.
pub type FieldErrors = BTreeMap<String, String>;

/// Application-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("Duplicate {0}")]
    Duplicate(&'static str),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("JWT error: {0}")]
    Jwt(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(fields) => {
                (StatusCode::BAD_REQUEST, Json(json!(fields))).into_response()
            }
            AppError::Duplicate(field) => {
                let body = json!({ field: format!("A user with this {} already exists", field) });
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Invalid credentials" })),
            )
                .into_response(),
            AppError::Jwt(msg) => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "error": msg }))).into_response()
            }
            AppError::InvalidToken(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            // Internal causes are logged, never exposed to the caller.
            AppError::Config(msg) => {
                tracing::error!(error = %msg, "configuration error");
                internal_response()
            }
            AppError::Db(e) => {
                tracing::error!(error = %e, "database error");
                internal_response()
            }
            AppError::Internal(e) => {
                tracing::error!(error = %e, "internal error");
                internal_response()
            }
        }
    }
}

fn internal_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
        .into_response()
}

pub type AppResult<T> = Result<T, AppError>;
