use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use crate::models::{ApiResponse, HttpMethod};

/// CatalogError
///
/// Failure modes of the permission catalog. A `Conflict` means another writer already
/// holds the `(path, method)` key and is never a hard failure on its own.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("permission for {method} {path} already exists")]
    Conflict { path: String, method: HttpMethod },
    #[error("permission catalog unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for CatalogError {
    fn from(err: sqlx::Error) -> Self {
        CatalogError::Unavailable(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// AppError
///
/// Handler-facing error. Rendered as the standard `{ code, message, data }` envelope
/// with `data` set to null and the HTTP status mirrored in `code`.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(ApiResponse::<()> {
            code: self.status.as_u16(),
            message: self.message,
            data: None,
        });

        (self.status, body).into_response()
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Conflict { .. } => Self::conflict(err.to_string()),
            CatalogError::Unavailable(ref msg) => {
                tracing::error!(error = %msg, "permission catalog operation failed");
                Self::internal(err.to_string())
            }
        }
    }
}
