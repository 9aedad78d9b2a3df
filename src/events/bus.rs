//! # Event bus for broadcasting scheduler events.
//!
//! [`Bus`] wraps [`tokio::sync::broadcast`] so the scheduler, the worker and
//! the subscriber fan-out can publish without ever blocking on a slow reader.
//!
//! ```text
//! Publishers:                          Consumer:
//!   RedialScheduler (commands) ──┐
//!   Worker (attempts)          ──┼──► Bus ──► listener ──► SubscriberSet
//!   SubscriberSet (overflow)   ──┘
//! ```
//!
//! ## Rules
//! - `publish()` never blocks; events are dropped when nobody listens.
//! - A single ring buffer of `capacity` events is shared by all receivers.
//! - Receivers that fall behind observe `RecvError::Lagged(n)` and skip `n` events.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for scheduler events.
///
/// Cheap to clone (holds an `Arc`-backed sender).
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<Event>(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event to all active receivers.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a receiver that observes events sent after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}
