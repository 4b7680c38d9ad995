use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;

use crate::domains::catalog::forms::FieldErrors;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found")]
    NotFound,
    #[error("Login required")]
    LoginRequired { next: String },
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Validation failed")]
    Validation(FieldErrors),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn login_required(next: impl Into<String>) -> Self {
        ApiError::LoginRequired { next: next.into() }
    }
}

/// Map unique constraint violations to a 409; everything else stays a 500
pub fn conflict_on_unique(err: anyhow::Error, message: &str) -> ApiError {
    if let Some(sqlx_err) = err.downcast_ref::<sqlx::Error>() {
        if let Some(db_err) = sqlx_err.as_database_error() {
            if db_err.is_unique_violation() {
                return ApiError::Conflict(message.to_string());
            }
        }
    }
    ApiError::Internal(err)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            // Mirrors the login wall: send the visitor off to sign in,
            // carrying where they were headed.
            ApiError::LoginRequired { next } => {
                let next: String = url::form_urlencoded::byte_serialize(next.as_bytes()).collect();
                Redirect::to(&format!("/login?next={next}")).into_response()
            }
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({ "errors": errors })),
            )
                .into_response(),
            ApiError::Internal(err) => {
                tracing::error!("internal server error: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
            other => {
                let (status, error_message) = match other {
                    ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
                    ApiError::InvalidCredentials => {
                        (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
                    }
                    ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
                    _ => unreachable!("handled above"),
                };
                (status, Json(serde_json::json!({ "error": error_message }))).into_response()
            }
        }
    }
}
