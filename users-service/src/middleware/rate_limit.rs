//! Token bucket rate limiting
//!
//! One bucket guards the static page for every caller. The bucket starts
//! full, refills continuously at `refill_per_second` and never holds more
//! than `capacity` tokens. A request is permitted when a whole token is
//! available; denied requests are not queued.
//!
//! Time comes from `tokio::time::Instant`, so tests can drive the bucket
//! with a paused clock.

use std::sync::{Mutex, PoisonError};
use tokio::time::Instant;

use crate::config::RateLimitConfig;

#[derive(Debug)]
struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

/// Shared token bucket
#[derive(Debug)]
pub struct TokenBucket {
    capacity: f64,
    refill_per_second: f64,
    state: Mutex<BucketState>,
}

impl TokenBucket {
    /// Full bucket holding `capacity` tokens
    ///
    /// Negative or non-finite settings are treated as zero.
    pub fn new(capacity: f64, refill_per_second: f64) -> Self {
        let capacity = sanitize(capacity);
        Self {
            capacity,
            refill_per_second: sanitize(refill_per_second),
            state: Mutex::new(BucketState {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        }
    }

    /// Bucket built from the `rate_limit` configuration section
    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.capacity, config.refill_per_second)
    }

    /// Take one token if available
    pub fn allow(&self) -> bool {
        self.allow_at(Instant::now())
    }

    /// Take one token if available, treating `now` as the current time
    ///
    /// An instant earlier than the last refill adds nothing.
    pub fn allow_at(&self, now: Instant) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        let elapsed = now.saturating_duration_since(state.last_refill).as_secs_f64();
        state.tokens = (state.tokens + elapsed * self.refill_per_second).min(self.capacity);
        if now > state.last_refill {
            state.last_refill = now;
        }

        if state.tokens >= 1.0 {
            state.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Tokens currently held, without refilling
    pub fn tokens(&self) -> f64 {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .tokens
    }

    /// Configured capacity
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Configured refill rate
    pub fn refill_per_second(&self) -> f64 {
        self.refill_per_second
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
