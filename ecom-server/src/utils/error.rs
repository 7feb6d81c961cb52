//! Application-level error handling
//!
//! Every failure the HTTP surface can produce maps to a [`shared::ErrorCode`]
//! and is rendered as the wire shape:
//!
//! ```json
//! {
//!   "status": 404,
//!   "code": "carts/cart-not-found",
//!   "message": "Cart not found"
//! }
//! ```
//!
//! Repository errors carry an [`ErrorCode`] already; [`AppError`] adds the
//! handler-level failures (validation, auth, upstream) on top.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use shared::{ErrorBody, ErrorCode};
use tracing::error;

use crate::db::repository::RepoError;

pub type AppResult<T> = Result<T, AppError>;

/// Application error: an [`ErrorCode`] plus an optional message override.
#[derive(Debug, thiserror::Error)]
#[error("{code}: {message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
}

impl AppError {
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.default_message().to_string(),
            code,
        }
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// 400 with a caller-facing reason.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::BadRequest, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(ErrorCode::Unauthorized)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::Forbidden, message)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::Unprocessable, message)
    }

    /// 500 with an internal reason; the reason is logged, not leaked.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::Internal, message)
    }
}

impl From<ErrorCode> for AppError {
    fn from(code: ErrorCode) -> Self {
        Self::new(code)
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound(code) | RepoError::Conflict(code) => Self::new(code),
            RepoError::Database(msg) => Self::internal(format!("database error: {msg}")),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.code.status();
        let body = if status >= 500 {
            // Internal details go to the log, a generic message to the client.
            error!(code = %self.code, error = %self.message, "request failed");
            ErrorBody::new(self.code, self.code.default_message())
        } else {
            ErrorBody::new(self.code, self.message)
        };
        let status =
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_not_found_keeps_code() {
        let app: AppError = RepoError::NotFound(ErrorCode::CartNotFound).into();
        assert_eq!(app.code.code(), "carts/cart-not-found");
        assert_eq!(app.code.status(), 404);
    }

    #[test]
    fn database_error_becomes_internal() {
        let app: AppError = RepoError::Database("locked".into()).into();
        assert_eq!(app.code.code(), "internal");
        assert_eq!(app.code.status(), 500);
    }
}
