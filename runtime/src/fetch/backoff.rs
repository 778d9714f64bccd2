//! Exponential backoff with random jitter.

use rand::Rng;
use std::time::Duration;

/// `base * 2^(attempt-1)` plus up to `jitter_max` of noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub base_delay: Duration,
    pub jitter_max: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(2000),
            jitter_max: Duration::from_millis(1000),
        }
    }
}

impl BackoffPolicy {
    pub fn new(base_delay: Duration, jitter_max: Duration) -> Self {
        Self {
            base_delay,
            jitter_max,
        }
    }

    /// Delay after failed attempt `attempt` (1-based), before jitter.
    pub fn base_delay_for(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(31);
        self.base_delay.saturating_mul(1u32 << exp)
    }

    /// Full delay after failed attempt `attempt`, jitter in `[0, jitter_max)`.
    pub fn delay_for<R: Rng>(&self, attempt: u32, rng: &mut R) -> Duration {
        self.base_delay_for(attempt).saturating_add(self.jitter(rng))
    }

    fn jitter<R: Rng>(&self, rng: &mut R) -> Duration {
        let max_ms = self.jitter_max.as_millis() as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rng.gen_range(0..max_ms))
    }
}
