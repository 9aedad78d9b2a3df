//! Redial queue and its data model.
//!
//! - [`RedialItem`], [`ItemId`], [`RedialStatus`] one tracked contact
//! - [`RedialQueue`] the set of tracked contacts and its four mutations
//! - [`QueueStats`] aggregate counts derived on demand

mod item;
#[allow(clippy::module_inception)]
mod queue;

pub use item::{ItemId, RedialItem, RedialStatus};
pub use queue::{QueueStats, RedialQueue};
