//! Rate Limiting Infrastructure
//!
//! In-process token bucket rate limiting keyed by client identifier.
//!
//! - [`RateLimitConfig`] - validated capacity / refill settings
//! - [`TokenBucket`] - one client's counter, internally synchronized
//! - [`BucketStore`] - client id -> bucket map with atomic get-or-create
//!
//! State lives only in memory: it is neither shared between server instances
//! nor kept across restarts.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use parking_lot::Mutex;

pub const DEFAULT_REQUESTS_PER_MINUTE: u64 = 60;
pub const DEFAULT_BUCKET_CAPACITY: u64 = 100;

/// Rejected rate limit settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RateLimitConfigError {
    #[error("bucket capacity must be greater than zero")]
    ZeroCapacity,
    #[error("refill rate must be greater than zero")]
    ZeroRefillRate,
    #[error("refill interval must be greater than zero")]
    ZeroRefillInterval,
}

/// Rate limit configuration
///
/// A bucket holds at most `capacity` tokens and regains `refill_tokens`
/// every `refill_interval`, accrued continuously.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    capacity: u64,
    refill_tokens: u64,
    refill_interval: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_BUCKET_CAPACITY,
            refill_tokens: DEFAULT_REQUESTS_PER_MINUTE,
            refill_interval: Duration::from_secs(60),
        }
    }
}

impl RateLimitConfig {
    pub fn new(
        capacity: u64,
        refill_tokens: u64,
        refill_interval: Duration,
    ) -> Result<Self, RateLimitConfigError> {
        if capacity == 0 {
            return Err(RateLimitConfigError::ZeroCapacity);
        }
        if refill_tokens == 0 {
            return Err(RateLimitConfigError::ZeroRefillRate);
        }
        if refill_interval.is_zero() {
            return Err(RateLimitConfigError::ZeroRefillInterval);
        }
        Ok(Self {
            capacity,
            refill_tokens,
            refill_interval,
        })
    }

    /// `requests_per_minute` tokens regained every minute.
    pub fn per_minute(capacity: u64, requests_per_minute: u64) -> Result<Self, RateLimitConfigError> {
        Self::new(capacity, requests_per_minute, Duration::from_secs(60))
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn refill_tokens(&self) -> u64 {
        self.refill_tokens
    }

    pub fn refill_interval(&self) -> Duration {
        self.refill_interval
    }
}

/// Outcome of a consumption attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsumptionResult {
    pub consumed: bool,
    /// Tokens left after the attempt
    pub remaining: u64,
    /// How long until the request could succeed. `None` when consumed, or
    /// when more tokens were asked for than the bucket can ever hold.
    pub retry_after: Option<Duration>,
}

#[derive(Debug)]
struct BucketState {
    available: u64,
    /// Start of the not-yet-credited refill period
    last_refill: Instant,
    last_used: Instant,
}

impl BucketState {
    fn refill(&mut self, config: &RateLimitConfig, now: Instant) {
        if self.available >= config.capacity {
            // No credit accrues while full.
            self.last_refill = self.last_refill.max(now);
            return;
        }

        let elapsed = now.saturating_duration_since(self.last_refill).as_nanos();
        let interval = config.refill_interval.as_nanos();
        let rate = u128::from(config.refill_tokens);

        let earned = elapsed * rate / interval;
        if earned == 0 {
            return;
        }

        let room = u128::from(config.capacity - self.available);
        if earned >= room {
            self.available = config.capacity;
            self.last_refill = self.last_refill.max(now);
        } else {
            // `earned < room <= capacity`, so the cast is lossless. Only the
            // time actually converted into tokens is consumed; the fractional
            // remainder keeps accruing.
            self.available += earned as u64;
            let spent = (earned * interval).div_ceil(rate);
            self.last_refill += nanos(spent);
        }
    }

    fn wait_for(&self, config: &RateLimitConfig, tokens: u64, now: Instant) -> Duration {
        let missing = u128::from(tokens.saturating_sub(self.available));
        let needed = (missing * config.refill_interval.as_nanos())
            .div_ceil(u128::from(config.refill_tokens));
        (self.last_refill + nanos(needed)).saturating_duration_since(now)
    }
}

fn nanos(n: u128) -> Duration {
    Duration::from_nanos(u64::try_from(n).unwrap_or(u64::MAX))
}

/// A single client's token bucket.
///
/// Refill and consumption happen under one short lock, so concurrent
/// requests from the same client can neither spend the same token twice
/// nor credit the same elapsed time twice.
#[derive(Debug)]
pub struct TokenBucket {
    config: RateLimitConfig,
    state: Mutex<BucketState>,
}

impl TokenBucket {
    /// Create a full bucket.
    pub fn new(config: RateLimitConfig) -> Self {
        Self::starting_at(config, Instant::now())
    }

    /// Create a full bucket whose clock starts at `now`.
    pub fn starting_at(config: RateLimitConfig, now: Instant) -> Self {
        Self {
            config,
            state: Mutex::new(BucketState {
                available: config.capacity,
                last_refill: now,
                last_used: now,
            }),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Try to take `tokens` tokens right now. Never blocks waiting for refill.
    pub fn try_consume(&self, tokens: u64) -> ConsumptionResult {
        self.try_consume_at(tokens, Instant::now())
    }

    /// [`try_consume`](Self::try_consume) against an explicit clock reading.
    pub fn try_consume_at(&self, tokens: u64, now: Instant) -> ConsumptionResult {
        let mut state = self.state.lock();
        state.refill(&self.config, now);
        state.last_used = state.last_used.max(now);

        if tokens <= state.available {
            state.available -= tokens;
            return ConsumptionResult {
                consumed: true,
                remaining: state.available,
                retry_after: None,
            };
        }

        let retry_after = if tokens > self.config.capacity {
            None
        } else {
            Some(state.wait_for(&self.config, tokens, now))
        };

        ConsumptionResult {
            consumed: false,
            remaining: state.available,
            retry_after,
        }
    }

    /// Tokens available at `now`, after crediting refill.
    pub fn available_at(&self, now: Instant) -> u64 {
        let mut state = self.state.lock();
        state.refill(&self.config, now);
        state.available
    }

    /// Most recent consumption attempt (or creation time).
    pub fn last_used(&self) -> Instant {
        self.state.lock().last_used
    }
}

/// Client identifier -> [`TokenBucket`] map.
///
/// Construct one per process and share it by `Arc`. Buckets are created
/// lazily with the store's configuration and, unless
/// [`evict_idle`](Self::evict_idle) is called, live for the process lifetime.
#[derive(Debug)]
pub struct BucketStore {
    config: RateLimitConfig,
    buckets: DashMap<String, Arc<TokenBucket>>,
}

impl BucketStore {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            buckets: DashMap::new(),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Bucket for `client_id`, created on first use.
    ///
    /// Insertion goes through the map entry API, so concurrent first calls
    /// for the same id construct exactly one bucket and all callers get it.
    pub fn resolve(&self, client_id: &str) -> Arc<TokenBucket> {
        if let Some(bucket) = self.buckets.get(client_id) {
            return Arc::clone(bucket.value());
        }

        let entry = self
            .buckets
            .entry(client_id.to_owned())
            .or_insert_with(|| Arc::new(TokenBucket::new(self.config)));
        Arc::clone(entry.value())
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Drop buckets unused for at least `max_idle`. Returns how many went.
    ///
    /// A bucket that has not refilled to capacity is kept regardless of idle
    /// time, since recreating it would hand out tokens that were never earned.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        self.evict_idle_at(max_idle, Instant::now())
    }

    pub fn evict_idle_at(&self, max_idle: Duration, now: Instant) -> usize {
        let before = self.buckets.len();
        self.buckets.retain(|_, bucket| {
            now.saturating_duration_since(bucket.last_used()) < max_idle
                || bucket.available_at(now) < bucket.config().capacity()
        });
        before.saturating_sub(self.buckets.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn config(capacity: u64, per_minute: u64) -> RateLimitConfig {
        RateLimitConfig::per_minute(capacity, per_minute).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = RateLimitConfig::default();
        assert_eq!(config.capacity(), 100);
        assert_eq!(config.refill_tokens(), 60);
        assert_eq!(config.refill_interval(), Duration::from_secs(60));
    }

    #[test]
    fn test_config_rejects_zero_values() {
        assert_eq!(
            RateLimitConfig::per_minute(0, 60),
            Err(RateLimitConfigError::ZeroCapacity)
        );
        assert_eq!(
            RateLimitConfig::per_minute(10, 0),
            Err(RateLimitConfigError::ZeroRefillRate)
        );
        assert_eq!(
            RateLimitConfig::new(10, 10, Duration::ZERO),
            Err(RateLimitConfigError::ZeroRefillInterval)
        );
    }

    #[test]
    fn test_full_bucket_accepts_capacity_then_rejects() {
        for (capacity, rate) in [(1, 1), (2, 2), (5, 60), (100, 60), (7, 1000)] {
            let start = Instant::now();
            let bucket = TokenBucket::starting_at(config(capacity, rate), start);

            for i in 0..capacity {
                let result = bucket.try_consume_at(1, start);
                assert!(result.consumed, "call {i} of {capacity} should pass");
                assert_eq!(result.remaining, capacity - i - 1);
            }

            let result = bucket.try_consume_at(1, start);
            assert!(!result.consumed);
            assert_eq!(result.remaining, 0);
            assert!(result.retry_after.is_some());
        }
    }

    #[test]
    fn test_refill_caps_at_capacity() {
        let start = Instant::now();
        let bucket = TokenBucket::starting_at(config(10, 60), start);
        for _ in 0..10 {
            assert!(bucket.try_consume_at(1, start).consumed);
        }

        assert_eq!(bucket.available_at(start + Duration::from_secs(60)), 10);
        assert_eq!(bucket.available_at(start + Duration::from_secs(3600)), 10);
        assert_eq!(
            bucket.available_at(start + Duration::from_secs(86_400 * 365)),
            10
        );
    }

    #[test]
    fn test_refill_is_proportional_to_elapsed_time() {
        let start = Instant::now();
        // one token per second
        let bucket = TokenBucket::starting_at(config(60, 60), start);
        assert!(bucket.try_consume_at(60, start).consumed);

        assert_eq!(bucket.available_at(start + Duration::from_millis(999)), 0);
        assert_eq!(bucket.available_at(start + Duration::from_secs(1)), 1);
        assert_eq!(bucket.available_at(start + Duration::from_secs(10)), 10);
    }

    #[test]
    fn test_fractional_credit_is_kept_not_lost() {
        let start = Instant::now();
        let bucket = TokenBucket::starting_at(config(60, 60), start);
        assert!(bucket.try_consume_at(60, start).consumed);

        // 1.5s -> one token, half a token of credit carried over
        let r = bucket.try_consume_at(1, start + Duration::from_millis(1500));
        assert!(r.consumed);
        assert_eq!(r.remaining, 0);

        // 0.5s more completes the second token
        let r = bucket.try_consume_at(1, start + Duration::from_millis(2000));
        assert!(r.consumed);
    }

    #[test]
    fn test_partial_interval_never_over_grants() {
        let start = Instant::now();
        // two tokens per minute -> one every 30s
        let bucket = TokenBucket::starting_at(config(2, 2), start);
        assert!(bucket.try_consume_at(2, start).consumed);

        assert!(!bucket.try_consume_at(1, start + Duration::from_secs(29)).consumed);
        assert!(bucket.try_consume_at(1, start + Duration::from_secs(30)).consumed);
        assert!(!bucket.try_consume_at(1, start + Duration::from_secs(31)).consumed);
    }

    #[test]
    fn test_no_credit_accrues_while_full() {
        let start = Instant::now();
        let bucket = TokenBucket::starting_at(config(2, 2), start);

        // Sits full for an hour, then is drained.
        let later = start + Duration::from_secs(3600);
        assert!(bucket.try_consume_at(2, later).consumed);
        assert!(!bucket.try_consume_at(1, later + Duration::from_secs(1)).consumed);
    }

    #[test]
    fn test_request_larger_than_capacity_never_succeeds() {
        let start = Instant::now();
        let bucket = TokenBucket::starting_at(config(5, 60), start);

        let r = bucket.try_consume_at(6, start + Duration::from_secs(3600));
        assert!(!r.consumed);
        assert_eq!(r.remaining, 5);
        assert_eq!(r.retry_after, None);
    }

    #[test]
    fn test_failed_consumption_leaves_tokens_untouched() {
        let start = Instant::now();
        let bucket = TokenBucket::starting_at(config(5, 60), start);
        assert!(bucket.try_consume_at(3, start).consumed);

        let r = bucket.try_consume_at(3, start);
        assert!(!r.consumed);
        assert_eq!(r.remaining, 2);
        assert!(bucket.try_consume_at(2, start).consumed);
    }

    #[test]
    fn test_retry_after_reports_time_to_next_token() {
        let start = Instant::now();
        let bucket = TokenBucket::starting_at(config(2, 2), start);
        assert!(bucket.try_consume_at(2, start).consumed);

        let r = bucket.try_consume_at(1, start + Duration::from_secs(10));
        assert_eq!(r.retry_after, Some(Duration::from_secs(20)));
    }

    #[test]
    fn test_zero_token_request_is_a_no_op() {
        let start = Instant::now();
        let bucket = TokenBucket::starting_at(config(1, 1), start);
        assert!(bucket.try_consume_at(1, start).consumed);

        let r = bucket.try_consume_at(0, start);
        assert!(r.consumed);
        assert_eq!(r.remaining, 0);
    }

    #[test]
    fn test_concurrent_consumers_never_double_spend() {
        const CAPACITY: u64 = 500;
        const THREADS: usize = 16;
        const ATTEMPTS: usize = 100;

        // Refill so slow it cannot contribute during the test.
        let config = RateLimitConfig::new(CAPACITY, 1, Duration::from_secs(86_400)).unwrap();
        let bucket = TokenBucket::new(config);
        let granted = AtomicU64::new(0);

        std::thread::scope(|s| {
            for _ in 0..THREADS {
                s.spawn(|| {
                    for _ in 0..ATTEMPTS {
                        if bucket.try_consume(1).consumed {
                            granted.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                });
            }
        });

        assert_eq!(granted.load(Ordering::Relaxed), CAPACITY);
        assert!(!bucket.try_consume(1).consumed);
    }

    #[test]
    fn test_store_returns_same_bucket_for_same_client() {
        let store = BucketStore::new(config(3, 60));
        let a = store.resolve("10.0.0.1");
        let b = store.resolve("10.0.0.1");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_isolates_clients() {
        let store = BucketStore::new(config(2, 60));

        assert!(store.resolve("alice").try_consume(2).consumed);
        assert!(!store.resolve("alice").try_consume(1).consumed);

        let bob = store.resolve("bob").try_consume(1);
        assert!(bob.consumed);
        assert_eq!(bob.remaining, 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_store_concurrent_first_access_creates_one_bucket() {
        const THREADS: usize = 32;
        let store = BucketStore::new(config(THREADS as u64, 1));
        let granted = AtomicU64::new(0);

        let buckets: Vec<Arc<TokenBucket>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    s.spawn(|| {
                        let bucket = store.resolve("203.0.113.7");
                        if bucket.try_consume(1).consumed {
                            granted.fetch_add(1, Ordering::Relaxed);
                        }
                        bucket
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(store.len(), 1);
        assert!(buckets.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
        assert_eq!(granted.load(Ordering::Relaxed), THREADS as u64);
    }

    #[test]
    fn test_evict_idle_drops_only_stale_buckets() {
        let store = BucketStore::new(config(5, 60));
        store.resolve("stale");
        let fresh = store.resolve("fresh");

        let later = Instant::now() + Duration::from_secs(600);
        fresh.try_consume_at(1, later);

        let evicted = store.evict_idle_at(Duration::from_secs(300), later);
        assert_eq!(evicted, 1);
        assert_eq!(store.len(), 1);
        assert!(Arc::ptr_eq(&store.resolve("fresh"), &fresh));
    }

    #[test]
    fn test_evict_idle_keeps_drained_bucket_until_refilled() {
        let store = BucketStore::new(config(100, 1));
        let bucket = store.resolve("drained");
        let start = Instant::now();
        assert!(bucket.try_consume_at(100, start).consumed);

        // Idle long enough to qualify, but only 2 tokens earned back
        let two_minutes = start + Duration::from_secs(120);
        assert_eq!(store.evict_idle_at(Duration::from_secs(60), two_minutes), 0);
        assert!(Arc::ptr_eq(&store.resolve("drained"), &bucket));
        assert!(!store.resolve("drained").try_consume_at(50, two_minutes).consumed);

        let refilled = start + Duration::from_secs(100 * 60);
        assert_eq!(store.evict_idle_at(Duration::from_secs(60), refilled), 1);
        assert!(store.is_empty());
    }
}
