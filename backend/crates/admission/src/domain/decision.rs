//! Admission Decision

use std::time::Duration;

/// Why a request was let through or turned away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionReason {
    /// Key valid and a token was consumed
    Ok,
    /// Missing or wrong API key
    BadKey,
    /// Client bucket had no token to spare
    RateLimited,
    /// Path bypasses every check
    Exempt,
}

/// Outcome of running one request through the gate.
///
/// Produced and consumed within a single request; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionDecision {
    pub allowed: bool,
    /// Tokens left in the client's bucket. Zero when the bucket was never
    /// consulted (exempt path or bad key).
    pub remaining_tokens: u64,
    pub reason: AdmissionReason,
    /// Set on [`AdmissionReason::RateLimited`] when a retry can succeed
    pub retry_after: Option<Duration>,
}

impl AdmissionDecision {
    pub fn exempt() -> Self {
        Self {
            allowed: true,
            remaining_tokens: 0,
            reason: AdmissionReason::Exempt,
            retry_after: None,
        }
    }

    pub fn bad_key() -> Self {
        Self {
            allowed: false,
            remaining_tokens: 0,
            reason: AdmissionReason::BadKey,
            retry_after: None,
        }
    }

    pub fn ok(remaining_tokens: u64) -> Self {
        Self {
            allowed: true,
            remaining_tokens,
            reason: AdmissionReason::Ok,
            retry_after: None,
        }
    }

    pub fn rate_limited(remaining_tokens: u64, retry_after: Option<Duration>) -> Self {
        Self {
            allowed: false,
            remaining_tokens,
            reason: AdmissionReason::RateLimited,
            retry_after,
        }
    }
}
