//! Bounded exponential-backoff retry for outbound provider calls.

use std::time::Duration;

use tokio_retry::strategy::ExponentialBackoff;

/// Total attempts per call, including the first.
const MAX_ATTEMPTS: usize = 3;

/// Retry policy applied to every outbound provider call.
///
/// Sleeps between attempts follow 2^n seconds (1s, then 2s), each with
/// jitter uniformly drawn from [0,1) seconds added on top.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts per call, including the first.
    pub max_attempts: usize,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with a custom attempt bound.
    pub fn with_max_attempts(max_attempts: usize) -> Self {
        Self { max_attempts }
    }

    /// The delay sequence slept between attempts.
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        // from_millis(2) yields 2ms, 4ms, ...; scaled by 500 that is
        // 1s, 2s, ... between attempts.
        ExponentialBackoff::from_millis(2)
            .factor(500)
            .map(add_jitter)
            .take(self.max_attempts.saturating_sub(1))
    }
}

/// Add jitter uniformly drawn from [0,1) seconds.
fn add_jitter(delay: Duration) -> Duration {
    delay + Duration::from_secs_f64(rand::random::<f64>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_sleeps_twice() {
        let delays: Vec<Duration> = RetryPolicy::default().delays().collect();
        assert_eq!(delays.len(), 2);
    }

    #[test]
    fn test_delays_are_exponential_with_bounded_jitter() {
        let delays: Vec<Duration> = RetryPolicy::default().delays().collect();

        assert!(delays[0] >= Duration::from_secs(1) && delays[0] < Duration::from_secs(2));
        assert!(delays[1] >= Duration::from_secs(2) && delays[1] < Duration::from_secs(3));
    }

    #[test]
    fn test_single_attempt_policy_never_sleeps() {
        assert_eq!(RetryPolicy::with_max_attempts(1).delays().count(), 0);
    }
}
