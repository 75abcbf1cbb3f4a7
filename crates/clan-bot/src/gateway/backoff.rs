//! Reconnect delays: exponential with full jitter

use std::time::Duration;

use rand::Rng;

const BASE_DELAY: Duration = Duration::from_secs(1);
const MAX_DELAY: Duration = Duration::from_secs(60);

#[derive(Debug, Default)]
pub struct Backoff {
    attempt: u32,
}

impl Backoff {
    /// Upper bound for the current attempt
    fn ceiling(&self) -> Duration {
        BASE_DELAY.saturating_mul(1 << self.attempt.min(6)).min(MAX_DELAY)
    }

    /// Delay before the next attempt
    pub fn next_delay(&mut self) -> Duration {
        let ceiling = self.ceiling();
        self.attempt = self.attempt.saturating_add(1);
        ceiling.mul_f64(rand::thread_rng().gen_range(0.5..=1.0))
    }

    /// A connection came up; start over
    pub fn reset(&mut self) {
        self.attempt = 0;
    }
}

/// Random `[0, 1)` fraction of `interval`, used for the first heartbeat
pub fn jittered(interval: Duration) -> Duration {
    interval.mul_f64(rand::thread_rng().gen::<f64>())
}
