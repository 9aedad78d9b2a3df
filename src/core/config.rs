//! # Scheduler runtime configuration.
//!
//! [`SchedulerConfig`] holds the timing knobs of the worker loop. The retry
//! policy itself (attempt budget, cooldown, priority list) is **not** here: it
//! is operator-editable at runtime and lives in the
//! [`PolicyStore`](crate::PolicyStore).
//!
//! ## Sentinel values
//! - `pacing = 0s` → next attempt starts right after the previous one
//! - `dial_timeout = 0s` → no timeout on the gateway call
//! - `bus_capacity = 0` → clamped to 1

use std::time::Duration;

use crate::policies::JitterPolicy;

/// Configuration for the redial scheduler runtime.
///
/// ## Field semantics
/// - `tick_interval`: period of the scan schedule (first tick is immediate on `start`)
/// - `pacing`: wait between two consecutive attempts of one activation
/// - `pacing_jitter`: randomization applied to `pacing`
/// - `dial_timeout`: upper bound for one gateway call; on expiry the attempt fails
/// - `grace`: how long `shutdown` waits for the worker and its in-flight attempt
/// - `bus_capacity`: event bus ring buffer size
#[derive(Clone, Debug)]
pub struct SchedulerConfig {
    /// Period between two scans of the queue.
    pub tick_interval: Duration,

    /// Delay between consecutive attempts inside one activation.
    ///
    /// Keeps the dialing rate under provider limits; unrelated to the
    /// per-contact cooldown of the retry policy.
    pub pacing: Duration,

    /// Jitter applied to `pacing`.
    pub pacing_jitter: JitterPolicy,

    /// Timeout of a single gateway call.
    ///
    /// - `Duration::ZERO` = no timeout
    /// - `> 0` = the attempt fails with `DialError::Timeout` when exceeded
    pub dial_timeout: Duration,

    /// Maximum time `shutdown` waits for the worker to exit.
    pub grace: Duration,

    /// Capacity of the event bus broadcast channel.
    pub bus_capacity: usize,
}

impl SchedulerConfig {
    /// Tick period, never zero (`tokio::time::interval` rejects a zero period).
    #[inline]
    pub fn tick_period(&self) -> Duration {
        self.tick_interval.max(Duration::from_millis(1))
    }

    /// Returns the dial timeout as an `Option` (`None` = no timeout).
    #[inline]
    pub fn dial_timeout(&self) -> Option<Duration> {
        if self.dial_timeout == Duration::ZERO {
            None
        } else {
            Some(self.dial_timeout)
        }
    }

    /// Pacing delay with jitter applied.
    #[inline]
    pub fn pacing_delay(&self) -> Duration {
        self.pacing_jitter.apply(self.pacing)
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for SchedulerConfig {
    /// Default configuration:
    ///
    /// - `tick_interval = 30s`
    /// - `pacing = 5s`, no jitter
    /// - `dial_timeout = 30s`
    /// - `grace = 35s` (one dial timeout plus slack)
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(30),
            pacing: Duration::from_secs(5),
            pacing_jitter: JitterPolicy::None,
            dial_timeout: Duration::from_secs(30),
            grace: Duration::from_secs(35),
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels() {
        let cfg = SchedulerConfig {
            tick_interval: Duration::ZERO,
            dial_timeout: Duration::ZERO,
            bus_capacity: 0,
            ..SchedulerConfig::default()
        };
        assert_eq!(cfg.tick_period(), Duration::from_millis(1));
        assert_eq!(cfg.dial_timeout(), None);
        assert_eq!(cfg.bus_capacity_clamped(), 1);
        assert_eq!(
            SchedulerConfig::default().dial_timeout(),
            Some(Duration::from_secs(30))
        );
    }
}
