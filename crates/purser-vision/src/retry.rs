//! Retry policy for provider calls
//!
//! Retries are driven by an explicit policy value and a bounded loop in the
//! gateway. The policy answers two questions: how many attempts in total,
//! and how long to wait after a given failed attempt.

use std::time::Duration;

/// Default total attempts per provider call
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default backoff base (1 second)
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Attempt budget and backoff schedule for one provider call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay_ms: u64,
}

impl RetryPolicy {
    /// Create a policy; at least one attempt and a non-zero base delay are
    /// always enforced
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay_ms: (base_delay.as_millis().max(1)) as u64,
        }
    }

    /// Total attempts allowed, the first call included
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Backoff to sleep after the given failed attempt (1-based)
    ///
    /// Exponential: `base * 2^(attempt - 1)`, exponent capped to keep the
    /// multiplication from overflowing.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let backoff = self.base_delay_ms.saturating_mul(1u64 << exponent);
        Duration::from_millis(backoff.max(self.base_delay_ms))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_BASE_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_per_attempt() {
        let policy = RetryPolicy::new(5, Duration::from_millis(100));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(400));
        assert_eq!(policy.delay_for_attempt(4), Duration::from_millis(800));
    }

    #[test]
    fn test_exponent_is_capped() {
        let policy = RetryPolicy::new(100, Duration::from_millis(1));
        assert_eq!(policy.delay_for_attempt(17), policy.delay_for_attempt(50));
    }

    #[test]
    fn test_at_least_one_attempt() {
        let policy = RetryPolicy::new(0, Duration::from_millis(10));
        assert_eq!(policy.max_attempts(), 1);
    }

    #[test]
    fn test_zero_base_delay_is_bumped() {
        let policy = RetryPolicy::new(3, Duration::ZERO);
        assert!(policy.delay_for_attempt(1) >= Duration::from_millis(1));
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), DEFAULT_MAX_ATTEMPTS);
        assert_eq!(policy.delay_for_attempt(1), DEFAULT_BASE_DELAY);
    }
}
