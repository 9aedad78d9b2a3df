//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out
//! and (with the `logging` feature) the built-in [`LogWriter`].
//!
//! ```text
//!   Scheduler / Worker ── publish(Event) ──► Bus ──► listener ──► SubscriberSet
//!                                                                   │
//!                                                        ┌──────────┼─────────┐
//!                                                        ▼          ▼         ▼
//!                                                    LogWriter   Audit     UI push
//! ```

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
