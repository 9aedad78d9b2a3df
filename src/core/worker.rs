//! # Worker: the scheduler loop.
//!
//! One worker exists per activation (`start`). It wakes on a fixed tick, or
//! earlier when something changes, and then drains every eligible item one
//! attempt at a time.
//!
//! ```text
//! loop {
//!   select! { token.cancelled() → exit
//!             ticker.tick()              (first tick is immediate)
//!             wake.notified() }          (enqueue / resume / policy change)
//!   drain:
//!     while let Some(item) = claim_next() {
//!       ├─► publish AttemptStarting
//!       ├─► dial_once()                  (no lock held, not cancellable)
//!       ├─► finish_attempt()             (counts attempt, publishes outcome)
//!       ├─► exit if token cancelled
//!       └─► sleep(pacing)                (cancellable)
//!     }
//! }
//! ```
//!
//! ## Rules
//! - Attempts run **sequentially**; at most one item is `calling` per worker.
//! - Cancellation is honored at safe points only (tick wait, pacing sleep).
//! - A cancelled worker still records the attempt it had in flight.

use std::sync::Arc;

use tokio::{
    select,
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::core::{dialer::dial_once, state::Shared};
use crate::events::{Event, EventKind};

pub(crate) struct Worker {
    shared: Arc<Shared>,
    run_id: u64,
}

impl Worker {
    pub fn new(shared: Arc<Shared>, run_id: u64) -> Self {
        Self { shared, run_id }
    }

    /// Runs until `token` is cancelled.
    pub async fn run(self, token: CancellationToken) {
        let mut ticker = time::interval(self.shared.cfg.tick_period());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            select! {
                biased;
                _ = token.cancelled() => break,
                _ = ticker.tick() => trace!(run_id = self.run_id, "tick"),
                _ = self.shared.wake.notified() => trace!(run_id = self.run_id, "woken"),
            }
            if !self.drain(&token).await {
                break;
            }
        }
        debug!(run_id = self.run_id, "worker exited");
    }

    /// Dials eligible items until none is left. Returns `false` once cancelled.
    async fn drain(&self, token: &CancellationToken) -> bool {
        while let Some(item) = self.shared.claim_next(self.run_id).await {
            let attempt = item.attempts.saturating_add(1);
            self.shared.bus.publish(
                Event::for_item(EventKind::AttemptStarting, &item).with_attempt(attempt),
            );

            let outcome = dial_once(
                self.shared.gateway.as_ref(),
                &item,
                attempt,
                self.shared.cfg.dial_timeout(),
                &self.shared.bus,
            )
            .await;
            self.shared.finish_attempt(&item, attempt, outcome).await;

            if token.is_cancelled() {
                return false;
            }
            let pacing = self.shared.cfg.pacing_delay();
            if !pacing.is_zero() {
                select! {
                    _ = time::sleep(pacing) => {},
                    _ = token.cancelled() => return false,
                }
            }
        }
        true
    }
}
