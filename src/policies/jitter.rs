//! # Jitter for the inter-attempt pacing delay.
//!
//! After each attempt the worker waits a short pacing delay before dialing the
//! next contact, to stay under provider-side rate limits. [`JitterPolicy`]
//! optionally randomizes that delay so several deployments sharing one
//! provider account do not dial in lock-step.
//!
//! - [`JitterPolicy::None`]: exact pacing delay
//! - [`JitterPolicy::Full`]: random delay in `[0, pacing]`
//! - [`JitterPolicy::Equal`]: `pacing/2 + random[0, pacing/2]`

use rand::Rng;
use std::time::Duration;

/// Policy controlling randomization of the pacing delay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JitterPolicy {
    /// No jitter: use the exact pacing delay.
    #[default]
    None,
    /// Random delay in `[0, pacing]`.
    Full,
    /// `pacing/2 + random[0, pacing/2]`; keeps at least half of the delay.
    Equal,
}

impl JitterPolicy {
    /// Applies jitter to the given delay.
    pub fn apply(&self, delay: Duration) -> Duration {
        let ms = delay.as_millis().min(u128::from(u64::MAX)) as u64;
        if ms == 0 {
            return Duration::ZERO;
        }
        let mut rng = rand::rng();
        match self {
            JitterPolicy::None => delay,
            JitterPolicy::Full => Duration::from_millis(rng.random_range(0..=ms)),
            JitterPolicy::Equal => {
                let half = ms / 2;
                let extra = if half == 0 {
                    0
                } else {
                    rng.random_range(0..=half)
                };
                Duration::from_millis(half + extra)
            }
        }
    }
}
