//! Admission Gate
//!
//! Decides, per request, whether it may reach the handlers.

use axum::http::HeaderMap;
use platform::client::resolve_client_identifier;
use platform::crypto::constant_time_eq;
use platform::rate_limit::BucketStore;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::application::config::AdmissionConfig;
use crate::domain::decision::AdmissionDecision;
use crate::domain::exempt::is_exempt_path;

/// Header carrying the shared secret
pub const API_KEY_HEADER: &str = "x-api-key";

/// Admission gate
///
/// Cheap to clone; the bucket store is shared, so every clone rate limits
/// against the same per-client state.
#[derive(Debug, Clone)]
pub struct AdmissionGate {
    config: Arc<AdmissionConfig>,
    buckets: Arc<BucketStore>,
}

impl AdmissionGate {
    pub fn new(config: AdmissionConfig, buckets: Arc<BucketStore>) -> Self {
        Self {
            config: Arc::new(config),
            buckets,
        }
    }

    /// Gate with its own store built from the configured rate limit
    pub fn with_fresh_store(config: AdmissionConfig) -> Self {
        let buckets = Arc::new(BucketStore::new(config.rate_limit));
        Self::new(config, buckets)
    }

    pub fn config(&self) -> &AdmissionConfig {
        &self.config
    }

    pub fn buckets(&self) -> &Arc<BucketStore> {
        &self.buckets
    }

    /// Run the checks in order: exemption, API key, rate limit.
    ///
    /// Never blocks; a decision is returned immediately.
    pub fn admit(
        &self,
        path: &str,
        headers: &HeaderMap,
        remote_addr: Option<SocketAddr>,
    ) -> AdmissionDecision {
        if is_exempt_path(path) {
            return AdmissionDecision::exempt();
        }

        if !self.key_matches(headers) {
            tracing::warn!(path = %path, "Unauthorized access attempt");
            return AdmissionDecision::bad_key();
        }

        let client = resolve_client_identifier(headers, remote_addr);
        let result = self.buckets.resolve(client.as_str()).try_consume(1);

        if !result.consumed {
            tracing::warn!(client = %client, path = %path, "Rate limit exceeded");
            return AdmissionDecision::rate_limited(result.remaining, result.retry_after);
        }

        tracing::debug!(client = %client, remaining = result.remaining, "Request admitted");
        AdmissionDecision::ok(result.remaining)
    }

    fn key_matches(&self, headers: &HeaderMap) -> bool {
        headers
            .get(API_KEY_HEADER)
            .is_some_and(|provided| {
                constant_time_eq(provided.as_bytes(), self.config.api_key().as_bytes())
            })
    }
}
