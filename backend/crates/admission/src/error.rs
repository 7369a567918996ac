//! Admission Error Types
//!
//! Admission failures integrate with the unified `kernel::error::AppError`
//! system so callers get the same problem document as every other error.

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use std::time::Duration;
use thiserror::Error;

use crate::application::config::ConfigError;
use crate::presentation::middleware::X_RATE_LIMIT_REMAINING;

pub type AdmissionResult<T> = Result<T, AdmissionError>;

#[derive(Debug, Error)]
pub enum AdmissionError {
    /// Missing or wrong `X-API-Key`
    #[error("Invalid or missing API key")]
    Unauthorized { path: String },

    /// Client bucket is empty
    #[error("Rate limit exceeded. Try again later.")]
    RateLimited {
        path: String,
        remaining: u64,
        retry_after: Option<Duration>,
    },

    /// Startup configuration is unusable
    #[error("Invalid admission configuration: {0}")]
    Config(#[from] ConfigError),
}

impl AdmissionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AdmissionError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AdmissionError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AdmissionError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AdmissionError::Unauthorized { .. } => ErrorKind::Unauthorized,
            AdmissionError::RateLimited { .. } => ErrorKind::TooManyRequests,
            AdmissionError::Config(_) => ErrorKind::InternalServerError,
        }
    }

    /// Audit warnings are emitted by the gate itself, so only the
    /// unexpected case is logged here.
    fn log(&self) {
        match self {
            AdmissionError::Config(e) => {
                tracing::error!(error = %e, "Admission configuration error");
            }
            _ => {
                tracing::debug!(error = %self, "Admission rejected request");
            }
        }
    }
}

impl From<AdmissionError> for AppError {
    fn from(err: AdmissionError) -> Self {
        let app = AppError::new(err.kind(), err.to_string());
        match err {
            AdmissionError::Unauthorized { path } => app
                .with_action("Send the configured API key in the X-API-Key header")
                .with_instance(path),
            AdmissionError::RateLimited { path, .. } => app
                .with_action("Wait before retrying")
                .with_instance(path),
            AdmissionError::Config(e) => app.with_source(e),
        }
    }
}

impl IntoResponse for AdmissionError {
    fn into_response(self) -> Response {
        self.log();

        let rate_headers = match &self {
            AdmissionError::RateLimited {
                remaining,
                retry_after,
                ..
            } => Some((*remaining, *retry_after)),
            _ => None,
        };

        let mut response = AppError::from(self).into_response();

        if let Some((remaining, retry_after)) = rate_headers {
            let headers = response.headers_mut();
            headers.insert(X_RATE_LIMIT_REMAINING, HeaderValue::from(remaining));
            if let Some(wait) = retry_after {
                // Whole seconds, rounded up so a client never retries early.
                let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
                headers.insert(header::RETRY_AFTER, HeaderValue::from(secs));
            }
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let unauthorized = AdmissionError::Unauthorized {
            path: "/api/v1/sessions".into(),
        };
        assert_eq!(unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(unauthorized.kind(), ErrorKind::Unauthorized);

        let limited = AdmissionError::RateLimited {
            path: "/api/v1/sessions".into(),
            remaining: 0,
            retry_after: None,
        };
        assert_eq!(limited.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(limited.kind(), ErrorKind::TooManyRequests);

        let config = AdmissionError::from(ConfigError::Missing("API_KEY"));
        assert_eq!(config.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_unauthorized_problem_carries_path() {
        let app = AppError::from(AdmissionError::Unauthorized {
            path: "/api/v1/sessions".into(),
        });
        assert_eq!(app.status_code(), 401);
        assert_eq!(app.instance(), Some("/api/v1/sessions"));
        assert_eq!(app.message(), "Invalid or missing API key");
    }

    #[test]
    fn test_rate_limited_response_headers() {
        let response = AdmissionError::RateLimited {
            path: "/api/v1/sessions".into(),
            remaining: 0,
            retry_after: Some(Duration::from_millis(29_500)),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[X_RATE_LIMIT_REMAINING], "0");
        assert_eq!(response.headers()[header::RETRY_AFTER], "30");
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/problem+json"
        );
    }

    #[test]
    fn test_rate_limited_without_retry_hint() {
        let response = AdmissionError::RateLimited {
            path: "/api/v1/sessions".into(),
            remaining: 3,
            retry_after: None,
        }
        .into_response();

        assert_eq!(response.headers()[X_RATE_LIMIT_REMAINING], "3");
        assert!(response.headers().get(header::RETRY_AFTER).is_none());
    }
}
