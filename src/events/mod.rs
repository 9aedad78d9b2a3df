//! Scheduler events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `RedialScheduler` (operator commands, intake), the worker
//!   (attempt lifecycle), `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the scheduler's listener, which fans out to `SubscriberSet`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
