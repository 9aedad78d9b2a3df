//! Wall-clock timestamps for queue bookkeeping.
//!
//! [`SchedulerClock`] anchors a UTC timestamp to a `tokio::time::Instant`
//! at build time and advances it with the tokio clock. Cooldowns therefore
//! follow the same time source as ticks and pacing (paused and advanced
//! together under `tokio::time::pause`), and a wall clock stepping backwards
//! cannot shorten one.

use chrono::{DateTime, TimeDelta, Utc};
use tokio::time::Instant;

#[derive(Clone, Copy, Debug)]
pub(crate) struct SchedulerClock {
    origin_utc: DateTime<Utc>,
    origin: Instant,
}

impl SchedulerClock {
    pub fn new() -> Self {
        Self {
            origin_utc: Utc::now(),
            origin: Instant::now(),
        }
    }

    /// Current time, monotonic since construction.
    pub fn now(&self) -> DateTime<Utc> {
        match TimeDelta::from_std(self.origin.elapsed()) {
            Ok(elapsed) => self.origin_utc + elapsed,
            Err(_) => Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn follows_the_tokio_clock() {
        let clock = SchedulerClock::new();
        let t0 = clock.now();
        tokio::time::advance(Duration::from_secs(301)).await;
        assert_eq!(clock.now() - t0, TimeDelta::seconds(301));
    }
}
