//! Rate limiter for inbound WebSocket frames.
//!
//! Each connection carries a burst window and a sustained window; a frame is
//! processed only when both allow it.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Rate limiter using a sliding window algorithm
#[derive(Debug)]
pub struct RateLimiter {
    /// Timestamps of accepted frames inside the window
    timestamps: VecDeque<Instant>,
    /// Maximum number of frames allowed in the window
    max_requests: usize,
    /// Window length
    window: Duration,
}

impl RateLimiter {
    /// Create a new rate limiter
    ///
    /// # Example
    ///
    /// ```
    /// use tt_server::api::rate_limiter::RateLimiter;
    /// use std::time::Duration;
    ///
    /// let mut limiter = RateLimiter::new(2, Duration::from_secs(1));
    /// assert!(limiter.check());
    /// assert!(limiter.check());
    /// assert!(!limiter.check());
    /// ```
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            timestamps: VecDeque::with_capacity(max_requests),
            max_requests,
            window,
        }
    }

    /// `max_requests` per second
    pub fn per_second(max_requests: usize) -> Self {
        Self::new(max_requests, Duration::from_secs(1))
    }

    /// `max_requests` per minute
    pub fn per_minute(max_requests: usize) -> Self {
        Self::new(max_requests, Duration::from_secs(60))
    }

    /// Record a frame if the window has room.
    ///
    /// Returns `false` without recording when the limit is reached.
    pub fn check(&mut self) -> bool {
        let now = Instant::now();
        self.evict_expired(now);

        if self.timestamps.len() >= self.max_requests {
            return false;
        }

        self.timestamps.push_back(now);
        true
    }

    fn evict_expired(&mut self, now: Instant) {
        while let Some(ts) = self.timestamps.front() {
            if now.duration_since(*ts) > self.window {
                self.timestamps.pop_front();
            } else {
                break;
            }
        }
    }
}

/// Burst and sustained limiters for one connection
#[derive(Debug)]
pub struct ConnectionLimiter {
    burst: RateLimiter,
    sustained: RateLimiter,
}

/// Which window rejected a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitExceeded {
    Burst,
    Sustained,
}

impl LimitExceeded {
    /// Message sent back to the client
    pub fn client_message(&self) -> &'static str {
        match self {
            LimitExceeded::Burst => "Rate limit exceeded. Please slow down.",
            LimitExceeded::Sustained => "Too many messages. Please wait before sending more.",
        }
    }
}

impl ConnectionLimiter {
    pub fn new(burst_per_second: usize, sustained_per_minute: usize) -> Self {
        Self {
            burst: RateLimiter::per_second(burst_per_second),
            sustained: RateLimiter::per_minute(sustained_per_minute),
        }
    }

    /// Check both windows; the sustained window is only charged when the
    /// burst window accepts the frame
    pub fn check(&mut self) -> Result<(), LimitExceeded> {
        if !self.burst.check() {
            return Err(LimitExceeded::Burst);
        }
        if !self.sustained.check() {
            return Err(LimitExceeded::Sustained);
        }
        Ok(())
    }
}
