//! # Events emitted by the redial scheduler.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Control events**: operator commands (start, pause, resume, stop, policy updates)
//! - **Queue events**: intake and removal of redial items
//! - **Attempt events**: one dial attempt flowing through the gateway
//! - **Subscriber events**: delivery problems inside the fan-out
//!
//! The [`Event`] struct carries optional metadata such as the item id, the
//! phone number, the attempt number and a human-readable reason.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use redialvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::AttemptFailed)
//!     .with_phone("+15550100")
//!     .with_attempt(2)
//!     .with_reason("busy");
//!
//! assert_eq!(ev.kind, EventKind::AttemptFailed);
//! assert_eq!(ev.phone.as_deref(), Some("+15550100"));
//! assert_eq!(ev.attempt, Some(2));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::queue::{ItemId, RedialItem};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of scheduler events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets: `reason` (subscriber name and panic info).
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `reason` (subscriber name and "full"/"closed").
    SubscriberOverflow,

    // === Control events ===
    /// Scheduler moved to running (operator `start`).
    SchedulerStarted,
    /// Operator paused the scheduler.
    SchedulerPaused,
    /// Operator resumed the scheduler.
    SchedulerResumed,
    /// Operator stopped the scheduler.
    ///
    /// Sets: `item` when an attempt was still in flight.
    SchedulerStopped,

    /// Retry policy changed.
    PolicyUpdated,

    /// Retry policy could not be written to the store (kept in memory).
    ///
    /// Sets: `reason`.
    PolicyPersistFailed,

    // === Queue events ===
    /// A new contact entered the redial queue.
    ///
    /// Sets: `item`, `phone`, `reason` (call outcome).
    ItemEnqueued,

    /// A contact already in the queue was re-added and reset to attempt 0.
    ///
    /// Sets: `item`, `phone`, `reason`.
    ItemReset,

    /// Operator removed an item.
    ///
    /// Sets: `item`, `phone`.
    ItemRemoved,

    /// Intake refused a request (policy disabled, filtered, invalid).
    ///
    /// Sets: `phone`, `reason`.
    IntakeRejected,

    // === Attempt events ===
    /// A dial attempt is about to be placed.
    ///
    /// Sets: `item`, `phone`, `attempt` (1-based).
    AttemptStarting,

    /// The gateway reported a connected call.
    ///
    /// Sets: `item`, `phone`, `attempt`, `reason` (provider call id, if any).
    AttemptSucceeded,

    /// The attempt failed and the item will be retried after the cooldown.
    ///
    /// Sets: `item`, `phone`, `attempt`, `delay_ms` (cooldown), `reason`.
    AttemptFailed,

    /// The gateway exceeded the dial timeout (always followed by a failure event).
    ///
    /// Sets: `item`, `phone`, `attempt`, `timeout_ms`.
    DialTimeout,

    /// The attempt failed and the item used up its attempt budget.
    ///
    /// Sets: `item`, `phone`, `attempt`, `reason`.
    AttemptsExhausted,

    /// An attempt returned for an item that was removed meanwhile.
    ///
    /// Sets: `item`, `phone`, `attempt`.
    AttemptAbandoned,

    /// The in-flight pointer referenced an item that no longer exists and was reset.
    ///
    /// Sets: `item`.
    StaleInFlightCleared,
}

/// Scheduler event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Redial item the event refers to.
    pub item: Option<ItemId>,
    /// Phone number of the item.
    pub phone: Option<Arc<str>>,
    /// Attempt number (starting from 1).
    pub attempt: Option<u32>,
    /// Cooldown before the item becomes eligible again, in milliseconds.
    pub delay_ms: Option<u64>,
    /// Dial timeout in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Human-readable reason (errors, call outcome, call ids).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            item: None,
            phone: None,
            attempt: None,
            delay_ms: None,
            timeout_ms: None,
            reason: None,
        }
    }

    /// Creates an event describing `item` (id and phone number attached).
    pub fn for_item(kind: EventKind, item: &RedialItem) -> Self {
        Event::new(kind)
            .with_item(item.id)
            .with_phone(item.phone_number.as_str())
    }

    /// Attaches an item id.
    #[inline]
    pub fn with_item(mut self, id: ItemId) -> Self {
        self.item = Some(id);
        self
    }

    /// Attaches a phone number.
    #[inline]
    pub fn with_phone(mut self, phone: impl Into<Arc<str>>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Attaches an attempt number.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches a cooldown (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        self.delay_ms = Some(d.as_millis().min(u128::from(u64::MAX)) as u64);
        self
    }

    /// Attaches a dial timeout (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        self.timeout_ms = Some(d.as_millis().min(u128::from(u64::MAX)) as u64);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_reason(format!("subscriber={subscriber} info={info}"))
    }

    /// True for events the fan-out itself produces about delivery problems.
    #[inline]
    pub fn is_subscriber_event(&self) -> bool {
        matches!(
            self.kind,
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_numbers_increase() {
        let a = Event::new(EventKind::SchedulerStarted);
        let b = Event::new(EventKind::SchedulerStopped);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn durations_are_stored_in_millis() {
        let ev = Event::new(EventKind::DialTimeout)
            .with_timeout(Duration::from_secs(30))
            .with_delay(Duration::from_millis(1500));
        assert_eq!(ev.timeout_ms, Some(30_000));
        assert_eq!(ev.delay_ms, Some(1_500));
    }
}
