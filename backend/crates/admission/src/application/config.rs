//! Application Configuration
//!
//! Settings for the admission gate, read once at startup.

use platform::rate_limit::{
    DEFAULT_BUCKET_CAPACITY, DEFAULT_REQUESTS_PER_MINUTE, RateLimitConfig, RateLimitConfigError,
};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const ENV_API_KEY: &str = "API_KEY";
pub const ENV_REQUESTS_PER_MINUTE: &str = "RATE_LIMIT_REQUESTS_PER_MINUTE";
pub const ENV_BUCKET_CAPACITY: &str = "RATE_LIMIT_BUCKET_CAPACITY";
pub const ENV_IDLE_EVICTION_SECS: &str = "RATE_LIMIT_IDLE_EVICTION_SECS";

/// Startup configuration problems. None of these are recoverable: the
/// process must refuse to serve.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    RateLimit(#[from] RateLimitConfigError),
}

/// Admission configuration
#[derive(Clone)]
pub struct AdmissionConfig {
    /// Shared secret expected in `X-API-Key`
    api_key: String,
    pub rate_limit: RateLimitConfig,
    /// Buckets idle this long are swept. `None` keeps buckets forever.
    pub idle_eviction: Option<Duration>,
}

// Hand-written so the secret never reaches a log line.
impl fmt::Debug for AdmissionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdmissionConfig")
            .field("api_key", &"<redacted>")
            .field("rate_limit", &self.rate_limit)
            .field("idle_eviction", &self.idle_eviction)
            .finish()
    }
}

impl AdmissionConfig {
    pub fn new(api_key: impl Into<String>, rate_limit: RateLimitConfig) -> Result<Self, ConfigError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConfigError::Missing(ENV_API_KEY));
        }
        Ok(Self {
            api_key,
            rate_limit,
            idle_eviction: None,
        })
    }

    pub fn with_idle_eviction(mut self, idle: Duration) -> Self {
        self.idle_eviction = Some(idle);
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Build from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary key lookup.
    ///
    /// Blank values are treated as unset, so defaults apply.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = get(ENV_API_KEY).ok_or(ConfigError::Missing(ENV_API_KEY))?;

        let requests_per_minute =
            parse_or(get(ENV_REQUESTS_PER_MINUTE), ENV_REQUESTS_PER_MINUTE, DEFAULT_REQUESTS_PER_MINUTE)?;
        let capacity = parse_or(get(ENV_BUCKET_CAPACITY), ENV_BUCKET_CAPACITY, DEFAULT_BUCKET_CAPACITY)?;
        let rate_limit = RateLimitConfig::per_minute(capacity, requests_per_minute)?;

        let mut config = Self::new(api_key, rate_limit)?;

        if let Some(raw) = get(ENV_IDLE_EVICTION_SECS) {
            let secs: u64 = parse(&raw, ENV_IDLE_EVICTION_SECS)?;
            if secs == 0 {
                return Err(ConfigError::Invalid {
                    name: ENV_IDLE_EVICTION_SECS,
                    value: raw,
                    reason: "must be greater than zero".to_string(),
                });
            }
            config = config.with_idle_eviction(Duration::from_secs(secs));
        }

        Ok(config)
    }
}

fn parse<T>(raw: &str, name: &'static str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        name,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn parse_or<T>(raw: Option<String>, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match raw {
        Some(raw) => parse(&raw, name),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AdmissionConfig::from_lookup(lookup(&[(ENV_API_KEY, "secret")])).unwrap();
        assert_eq!(config.api_key(), "secret");
        assert_eq!(config.rate_limit, RateLimitConfig::default());
        assert_eq!(config.idle_eviction, None);
    }

    #[test]
    fn test_overrides() {
        let config = AdmissionConfig::from_lookup(lookup(&[
            (ENV_API_KEY, "secret"),
            (ENV_REQUESTS_PER_MINUTE, "2"),
            (ENV_BUCKET_CAPACITY, " 5 "),
            (ENV_IDLE_EVICTION_SECS, "900"),
        ]))
        .unwrap();

        assert_eq!(config.rate_limit.capacity(), 5);
        assert_eq!(config.rate_limit.refill_tokens(), 2);
        assert_eq!(config.rate_limit.refill_interval(), Duration::from_secs(60));
        assert_eq!(config.idle_eviction, Some(Duration::from_secs(900)));
    }

    #[test]
    fn test_missing_api_key() {
        let err = AdmissionConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(ENV_API_KEY));

        let err = AdmissionConfig::from_lookup(lookup(&[(ENV_API_KEY, "   ")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(ENV_API_KEY));
    }

    #[test]
    fn test_rejects_non_positive_limits() {
        let err = AdmissionConfig::from_lookup(lookup(&[
            (ENV_API_KEY, "secret"),
            (ENV_BUCKET_CAPACITY, "0"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::RateLimit(RateLimitConfigError::ZeroCapacity));

        let err = AdmissionConfig::from_lookup(lookup(&[
            (ENV_API_KEY, "secret"),
            (ENV_REQUESTS_PER_MINUTE, "0"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::RateLimit(RateLimitConfigError::ZeroRefillRate));

        let err = AdmissionConfig::from_lookup(lookup(&[
            (ENV_API_KEY, "secret"),
            (ENV_BUCKET_CAPACITY, "-1"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { name: ENV_BUCKET_CAPACITY, .. }
        ));

        let err = AdmissionConfig::from_lookup(lookup(&[
            (ENV_API_KEY, "secret"),
            (ENV_IDLE_EVICTION_SECS, "0"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { name: ENV_IDLE_EVICTION_SECS, .. }
        ));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = AdmissionConfig::new("hunter2", RateLimitConfig::default()).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
