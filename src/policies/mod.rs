//! Retry and pacing policies.
//!
//! ## Contents
//! - [`RetryPolicy`] who may be redialed, how often and how soon
//! - [`PolicyPatch`] partial update merged by the operator surface
//! - [`JitterPolicy`] randomization of the pacing delay between attempts
//!
//! ## Quick wiring
//! ```text
//! PolicyStore::load() ──► RetryPolicy (cached in the scheduler)
//!      └─► RedialQueue::eligible_items(policy, now)   cooldown + budget + priority
//!      └─► RedialQueue::record_attempt_result(.., max_attempts)
//! SchedulerConfig { pacing, pacing_jitter } ──► worker sleep between attempts
//! ```

mod jitter;
mod retry;

pub use jitter::JitterPolicy;
pub use retry::{PolicyPatch, RetryPolicy};
