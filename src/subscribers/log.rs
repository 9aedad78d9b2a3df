//! # LogWriter: events to `tracing`
//!
//! A subscriber that forwards every [`Event`] to the `tracing` facade under the
//! `redialvisor::events` target. Failures and exhaustion are logged at `warn`,
//! the rest at `info`/`debug`.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! INFO redialvisor::events: attempt starting item=… phone="+15550100" attempt=1
//! WARN redialvisor::events: attempt failed item=… phone="+15550100" attempt=1 cooldown_ms=300000 reason="busy"
//! WARN redialvisor::events: attempts exhausted item=… phone="+15550100" attempt=3
//! ```

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let item = e.item.map(|id| id.to_string());
        let item = item.as_deref().unwrap_or("-");
        let phone = e.phone.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("");

        match e.kind {
            EventKind::SchedulerStarted => info!(target: "redialvisor::events", "scheduler started"),
            EventKind::SchedulerPaused => info!(target: "redialvisor::events", "scheduler paused"),
            EventKind::SchedulerResumed => info!(target: "redialvisor::events", "scheduler resumed"),
            EventKind::SchedulerStopped => {
                info!(target: "redialvisor::events", in_flight = item, "scheduler stopped")
            }
            EventKind::PolicyUpdated => info!(target: "redialvisor::events", "retry policy updated"),
            EventKind::PolicyPersistFailed => {
                warn!(target: "redialvisor::events", reason, "retry policy not persisted")
            }
            EventKind::ItemEnqueued => {
                info!(target: "redialvisor::events", item, phone, reason, "item enqueued")
            }
            EventKind::ItemReset => {
                info!(target: "redialvisor::events", item, phone, reason, "item reset")
            }
            EventKind::ItemRemoved => {
                info!(target: "redialvisor::events", item, phone, "item removed")
            }
            EventKind::IntakeRejected => {
                debug!(target: "redialvisor::events", phone, reason, "intake rejected")
            }
            EventKind::AttemptStarting => info!(
                target: "redialvisor::events",
                item, phone, attempt = e.attempt, "attempt starting"
            ),
            EventKind::AttemptSucceeded => info!(
                target: "redialvisor::events",
                item, phone, attempt = e.attempt, call_id = reason, "attempt succeeded"
            ),
            EventKind::AttemptFailed => warn!(
                target: "redialvisor::events",
                item, phone, attempt = e.attempt, cooldown_ms = e.delay_ms, reason, "attempt failed"
            ),
            EventKind::DialTimeout => warn!(
                target: "redialvisor::events",
                item, phone, attempt = e.attempt, timeout_ms = e.timeout_ms, "dial timeout"
            ),
            EventKind::AttemptsExhausted => warn!(
                target: "redialvisor::events",
                item, phone, attempt = e.attempt, reason, "attempts exhausted"
            ),
            EventKind::AttemptAbandoned => warn!(
                target: "redialvisor::events",
                item, phone, attempt = e.attempt, "attempt abandoned, item was removed"
            ),
            EventKind::StaleInFlightCleared => {
                warn!(target: "redialvisor::events", item, "stale in-flight pointer cleared")
            }
            EventKind::SubscriberOverflow => {
                warn!(target: "redialvisor::events", reason, "subscriber overflow")
            }
            EventKind::SubscriberPanicked => {
                warn!(target: "redialvisor::events", reason, "subscriber panicked")
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
