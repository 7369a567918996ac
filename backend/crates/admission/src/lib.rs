//! Admission Module
//!
//! The filter every inbound request passes before any business logic:
//! path exemption, API key check, then per-client token bucket rate limiting.
//!
//! Layout:
//! - `domain/` - admission decision and the exempt path set
//! - `application/` - configuration and the [`AdmissionGate`]
//! - `presentation/` - axum middleware
//!
//! ## Usage
//! ```ignore
//! let gate = AdmissionGate::new(config, Arc::new(BucketStore::new(rate_limit)));
//! let app = with_admission(Router::new().merge(routes), gate);
//! ```

pub mod application;
pub mod domain;
pub mod error;
pub mod presentation;

pub use application::config::{AdmissionConfig, ConfigError};
pub use application::gate::{API_KEY_HEADER, AdmissionGate};
pub use domain::decision::{AdmissionDecision, AdmissionReason};
pub use error::{AdmissionError, AdmissionResult};
pub use presentation::middleware::{X_RATE_LIMIT_REMAINING, require_admission, with_admission};
