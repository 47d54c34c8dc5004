//! Fixed-window rate limiting for login and OTP endpoints

use dashmap::DashMap;
use shared::{AppError, ErrorCode};
use std::time::{Duration, Instant};

/// Per-key attempt counter over a fixed window
#[derive(Debug)]
pub struct RateLimiter {
    max_attempts: u32,
    window: Duration,
    buckets: DashMap<String, (Instant, u32)>,
}

impl RateLimiter {
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            buckets: DashMap::new(),
        }
    }

    /// Count one attempt for `key`; errors once the window is exhausted
    pub fn check(&self, key: &str) -> Result<(), AppError> {
        let now = Instant::now();
        let mut entry = self.buckets.entry(key.to_string()).or_insert((now, 0));
        let (started, count) = entry.value_mut();

        if now.duration_since(*started) >= self.window {
            *started = now;
            *count = 0;
        }
        if *count >= self.max_attempts {
            let retry_after = self.window.saturating_sub(now.duration_since(*started));
            return Err(AppError::with_message(
                ErrorCode::TooManyRequests,
                "Too many attempts, try again later",
            )
            .with_detail("retry_after_secs", retry_after.as_secs()));
        }
        *count += 1;
        Ok(())
    }

    /// Forget `key` (after a successful login)
    pub fn reset(&self, key: &str) {
        self.buckets.remove(key);
    }

    /// Drop expired windows
    pub fn purge(&self) {
        let now = Instant::now();
        self.buckets
            .retain(|_, (started, _)| now.duration_since(*started) < self.window);
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(10, Duration::from_secs(60))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_after_limit() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        assert!(limiter.check("login:a").is_ok());
        assert!(limiter.check("login:a").is_ok());
        let err = limiter.check("login:a").unwrap_err();
        assert_eq!(err.code, ErrorCode::TooManyRequests);

        // other keys are independent
        assert!(limiter.check("login:b").is_ok());

        limiter.reset("login:a");
        assert!(limiter.check("login:a").is_ok());
    }

    #[test]
    fn test_window_expiry() {
        let limiter = RateLimiter::new(1, Duration::from_millis(0));
        assert!(limiter.check("k").is_ok());
        assert!(limiter.check("k").is_ok());
        limiter.purge();
    }
}
