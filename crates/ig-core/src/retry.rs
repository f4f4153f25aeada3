//! Bounded backoff for transient store conflicts.
//!
//! The bound guarantees an insert call terminates under sustained
//! contention, at the price of occasionally reporting exhausted retries.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backoff {
    Fixed,
    #[default]
    Exponential,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    pub backoff: Backoff,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    /// Delay is scaled by a random factor in `[1 - jitter, 1 + jitter]`.
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff: Backoff::Exponential,
            base_delay_ms: 10,
            max_delay_ms: 500,
            jitter: 0.25,
        }
    }
}

impl RetryPolicy {
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        let delay_ms = delay.as_millis() as u64;
        Self {
            max_attempts,
            backoff: Backoff::Fixed,
            base_delay_ms: delay_ms,
            max_delay_ms: delay_ms,
            jitter: 0.0,
        }
    }

    /// Whether another attempt may follow attempt number `attempt` (1-based).
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Delay to wait after attempt number `attempt` (1-based) failed.
    pub fn next_delay(&self, attempt: u32) -> Duration {
        let base = match self.backoff {
            Backoff::Fixed => self.base_delay_ms,
            Backoff::Exponential => {
                let exponent = attempt.saturating_sub(1).min(20);
                self.base_delay_ms.saturating_mul(1u64 << exponent)
            }
        };
        let capped = base.min(self.max_delay_ms.max(self.base_delay_ms));

        let jitter = self.effective_jitter();
        if jitter == 0.0 || capped == 0 {
            return Duration::from_millis(capped);
        }
        let factor = rand::rng().random_range((1.0 - jitter)..=(1.0 + jitter));
        Duration::from_millis((capped as f64 * factor).round() as u64)
    }

    /// Jitter clamped to `[0, 1]`; a non-finite value disables jitter.
    fn effective_jitter(&self) -> f64 {
        if self.jitter.is_finite() {
            self.jitter.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}
