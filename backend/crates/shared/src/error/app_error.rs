//! Application Error - Unified error type for the application
//!
//! Defines [`AppError`], the [`FieldViolation`] detail type, and the
//! [`AppResult<T>`] alias.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use serde::Serialize;

use super::kind::ErrorKind;

/// A single rejected request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: Cow<'static, str>,
    pub message: Cow<'static, str>,
}

impl FieldViolation {
    pub fn new(field: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Unified application error.
///
/// Every error that reaches the HTTP boundary is converted into this type and
/// rendered as an RFC 7807 problem document.
///
/// ## Examples
/// ```rust
/// use kernel::error::{app_error::AppError, kind::ErrorKind};
///
/// let err = AppError::unauthorized("Invalid or missing API key")
///     .with_instance("/api/v1/sessions");
/// assert_eq!(err.status_code(), 401);
/// assert_eq!(err.instance(), Some("/api/v1/sessions"));
/// ```
pub struct AppError {
    kind: ErrorKind,
    /// Client-facing message
    message: Cow<'static, str>,
    /// What the client should do next
    action: Option<Cow<'static, str>>,
    /// Request path the error relates to
    instance: Option<String>,
    violations: Vec<FieldViolation>,
    /// Underlying cause, never serialized
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

/// `Result<T, AppError>`
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    // ========================================================================
    // Constructors
    // ========================================================================

    #[inline]
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            action: None,
            instance: None,
            violations: Vec::new(),
            source: None,
        }
    }

    #[inline]
    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    #[inline]
    pub fn unauthorized(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    #[inline]
    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    #[inline]
    pub fn conflict(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    #[inline]
    pub fn too_many_requests(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::TooManyRequests, message)
    }

    #[inline]
    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InternalServerError, message)
    }

    #[inline]
    pub fn service_unavailable(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, message)
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    #[inline]
    pub fn with_action(mut self, action: impl Into<Cow<'static, str>>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Attach the request path (`instance` in the problem document).
    #[inline]
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    /// Attach per-field validation failures.
    #[inline]
    pub fn with_violations(mut self, violations: Vec<FieldViolation>) -> Self {
        self.violations = violations;
        self
    }

    #[inline]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[inline]
    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    #[inline]
    pub fn instance(&self) -> Option<&str> {
        self.instance.as_deref()
    }

    #[inline]
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    #[inline]
    pub fn is_server_error(&self) -> bool {
        self.kind.is_server_error()
    }

    /// Problem document body (RFC 7807 plus `code` and `errors` extensions).
    pub fn problem_body(&self) -> serde_json::Value {
        let mut body = serde_json::json!({
            "type": format!("https://httpstatuses.io/{}", self.status_code()),
            "title": self.kind.as_str(),
            "status": self.status_code(),
            "code": self.kind.code(),
            "detail": self.message(),
        });
        if let Some(action) = self.action() {
            body["action"] = serde_json::Value::from(action);
        }
        if let Some(instance) = self.instance() {
            body["instance"] = serde_json::Value::from(instance);
        }
        if !self.violations.is_empty() {
            body["errors"] = serde_json::to_value(&self.violations).unwrap_or_default();
        }
        body
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = f.debug_struct("AppError");
        builder.field("kind", &self.kind);
        builder.field("message", &self.message);
        if let Some(instance) = &self.instance {
            builder.field("instance", instance);
        }
        if !self.violations.is_empty() {
            builder.field("violations", &self.violations);
        }
        if let Some(source) = &self.source {
            builder.field("source", source);
        }
        builder.finish()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let Some(action) = &self.action {
            write!(f, " (Action: {})", action)?;
        }
        Ok(())
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_error() {
        let err = AppError::new(ErrorKind::NotFound, "Session not found");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.message(), "Session not found");
        assert!(err.action().is_none());
        assert!(err.instance().is_none());
    }

    #[test]
    fn test_convenience_constructors() {
        assert_eq!(AppError::bad_request("test").status_code(), 400);
        assert_eq!(AppError::unauthorized("test").status_code(), 401);
        assert_eq!(AppError::not_found("test").status_code(), 404);
        assert_eq!(AppError::conflict("test").status_code(), 409);
        assert_eq!(AppError::too_many_requests("test").status_code(), 429);
        assert_eq!(AppError::internal("test").status_code(), 500);
        assert_eq!(AppError::service_unavailable("test").status_code(), 503);
    }

    #[test]
    fn test_with_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err = AppError::internal("Failed").with_source(io_err);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_display() {
        let err = AppError::too_many_requests("Rate limit exceeded. Try again later.");
        assert_eq!(
            err.to_string(),
            "[Too Many Requests] Rate limit exceeded. Try again later."
        );

        let err = AppError::bad_request("Invalid").with_action("Fix the title");
        assert!(err.to_string().contains("Action:"));
    }

    #[test]
    fn test_problem_body_fields() {
        let err = AppError::unauthorized("Invalid or missing API key")
            .with_instance("/api/v1/sessions");
        let body = err.problem_body();

        assert_eq!(body["status"], 401);
        assert_eq!(body["title"], "Unauthorized");
        assert_eq!(body["code"], "UNAUTHORIZED");
        assert_eq!(body["detail"], "Invalid or missing API key");
        assert_eq!(body["instance"], "/api/v1/sessions");
        assert!(body.get("errors").is_none());
        assert!(body.get("action").is_none());
    }

    #[test]
    fn test_problem_body_violations() {
        let err = AppError::bad_request("Request validation failed").with_violations(vec![
            FieldViolation::new("userId", "User ID is required"),
            FieldViolation::new("title", "Title must not exceed 255 characters"),
        ]);
        let body = err.problem_body();

        let errors = body["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0]["field"], "userId");
        assert_eq!(errors[1]["message"], "Title must not exceed 255 characters");
    }
}
