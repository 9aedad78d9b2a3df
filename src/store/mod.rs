//! # Durable storage for the retry policy.
//!
//! [`PolicyStore`] is a two-call contract: `load` returns the persisted
//! policy (defaults when nothing was saved yet), `save` writes it through.
//! The scheduler caches the policy in memory and calls `save` after every
//! mutation.
//!
//! Implementations:
//! - [`JsonFileStore`]: single JSON record on disk, atomic replace on save;
//! - [`MemoryStore`]: in-process only (tests, ephemeral deployments).
//!
//! Failures are never fatal: see [`load_or_default`] for the read side, and
//! [`RedialScheduler::update_config`](crate::RedialScheduler::update_config)
//! for the write side.

mod json;
mod memory;

pub use json::JsonFileStore;
pub use memory::MemoryStore;

use tracing::warn;

use crate::error::StoreError;
use crate::policies::RetryPolicy;

/// Read/write-through storage for a single [`RetryPolicy`] record.
///
/// Reads must be side-effect free; both calls must be idempotent.
pub trait PolicyStore: Send + Sync + 'static {
    /// Returns the persisted policy, or [`RetryPolicy::default`] when nothing was saved.
    fn load(&self) -> Result<RetryPolicy, StoreError>;

    /// Persists `policy`, replacing the previous record.
    fn save(&self, policy: &RetryPolicy) -> Result<(), StoreError>;
}

/// Loads the policy, degrading to defaults (with a warning) if the store fails.
pub fn load_or_default(store: &dyn PolicyStore) -> RetryPolicy {
    match store.load() {
        Ok(policy) => policy.sanitized(),
        Err(e) => {
            warn!(error = %e, label = e.as_label(), "failed to load retry policy, using defaults");
            RetryPolicy::default()
        }
    }
}
