//! Randomized delays that keep replies from feeling instantaneous.

use rand::Rng;
use std::ops::RangeInclusive;
use std::time::Duration;

/// Millisecond ranges sampled before dispatch and before the reply append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pacing {
    pub before_request: RangeInclusive<u64>,
    pub before_reply: RangeInclusive<u64>,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            before_request: 400..=900,
            before_reply: 200..=600,
        }
    }
}

impl Pacing {
    /// No delays at all.
    pub fn none() -> Self {
        Self {
            before_request: 0..=0,
            before_reply: 0..=0,
        }
    }

    pub fn request_delay(&self) -> Duration {
        sample(&self.before_request)
    }

    pub fn reply_delay(&self) -> Duration {
        sample(&self.before_reply)
    }
}

fn sample(range: &RangeInclusive<u64>) -> Duration {
    if range.is_empty() || *range.end() == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::thread_rng().gen_range(range.clone()))
}

/// Sleep for `delay`, skipping the timer entirely when zero.
pub(crate) async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
