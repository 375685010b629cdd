use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::sheets::TaskChangeError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, "bad_request", message),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "missing or invalid bearer token".to_string(),
            ),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            Self::Conflict(message) => (StatusCode::CONFLICT, "conflict", message),
        };

        let body = Json(ErrorBody {
            error: error.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<TaskChangeError> for AppError {
    fn from(error: TaskChangeError) -> Self {
        let message = error.to_string();
        match error {
            TaskChangeError::TaskNotFound(_) => Self::NotFound(message),
            TaskChangeError::DuplicateTaskId(_) => Self::Conflict(message),
            TaskChangeError::OutsideWindow { .. } => Self::BadRequest(message),
        }
    }
}
