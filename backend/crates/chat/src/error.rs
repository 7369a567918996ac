//! Chat Error Types
//!
//! Chat-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{
    app_error::{AppError, FieldViolation},
    kind::ErrorKind,
};
use kernel::id::SessionId;
use thiserror::Error;

/// Chat-specific result type alias
pub type ChatResult<T> = Result<T, ChatError>;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Session not found with ID: {0}")]
    SessionNotFound(SessionId),

    /// One entry per rejected field
    #[error("Request validation failed")]
    Validation(Vec<FieldViolation>),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ChatError {
    pub fn invalid(violation: FieldViolation) -> Self {
        ChatError::Validation(vec![violation])
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ChatError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ChatError::Validation(_) => StatusCode::BAD_REQUEST,
            ChatError::Database(_) | ChatError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ChatError::SessionNotFound(_) => ErrorKind::NotFound,
            ChatError::Validation(_) => ErrorKind::BadRequest,
            ChatError::Database(_) | ChatError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    fn log(&self) {
        match self {
            ChatError::Database(e) => {
                tracing::error!(error = %e, "Chat database error");
            }
            ChatError::Internal(msg) => {
                tracing::error!(message = %msg, "Chat internal error");
            }
            ChatError::SessionNotFound(id) => {
                tracing::warn!(session_id = %id, "Resource not found");
            }
            ChatError::Validation(violations) => {
                tracing::warn!(violations = violations.len(), "Validation errors");
            }
        }
    }
}

impl From<ChatError> for AppError {
    fn from(err: ChatError) -> Self {
        match err {
            // Constraint codes (e.g. a message racing a session delete) get
            // their own status from the kernel mapping.
            ChatError::Database(e) => AppError::from(e),
            ChatError::Validation(violations) => {
                AppError::bad_request("Request validation failed").with_violations(violations)
            }
            ChatError::Internal(msg) => {
                AppError::internal("An unexpected error occurred").with_source(ChatError::Internal(msg))
            }
            other => AppError::new(other.kind(), other.to_string()),
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_session() {
        let id: SessionId = "6f9619ff-8b86-d011-b42d-00cf4fc964ff".parse().unwrap();
        let app = AppError::from(ChatError::SessionNotFound(id));
        assert_eq!(app.status_code(), 404);
        assert_eq!(
            app.message(),
            "Session not found with ID: 6f9619ff-8b86-d011-b42d-00cf4fc964ff"
        );
    }

    #[test]
    fn test_validation_keeps_violations() {
        let err = ChatError::Validation(vec![
            FieldViolation::new("userId", "User ID is required"),
            FieldViolation::new("title", "Title must not exceed 255 characters"),
        ]);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let app = AppError::from(err);
        assert_eq!(app.violations().len(), 2);
        assert_eq!(app.problem_body()["errors"][0]["field"], "userId");
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let app = AppError::from(ChatError::Internal("row had sender 'BOT'".into()));
        assert_eq!(app.status_code(), 500);
        assert_eq!(app.message(), "An unexpected error occurred");
    }
}
