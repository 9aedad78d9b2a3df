use std::sync::Mutex;

use crate::error::StoreError;
use crate::policies::RetryPolicy;

use super::PolicyStore;

/// In-process policy store; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    record: Mutex<Option<RetryPolicy>>,
}

impl MemoryStore {
    /// Creates an empty store (loads return defaults).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `policy`.
    pub fn with_policy(policy: RetryPolicy) -> Self {
        Self {
            record: Mutex::new(Some(policy)),
        }
    }

    /// Returns the last saved record, if any.
    pub fn saved(&self) -> Option<RetryPolicy> {
        self.record.lock().ok().and_then(|r| r.clone())
    }
}

impl PolicyStore for MemoryStore {
    fn load(&self) -> Result<RetryPolicy, StoreError> {
        Ok(self.saved().unwrap_or_default())
    }

    fn save(&self, policy: &RetryPolicy) -> Result<(), StoreError> {
        let mut record = self
            .record
            .lock()
            .map_err(|_| std::io::Error::other("memory store lock poisoned"))?;
        *record = Some(policy.clone());
        Ok(())
    }
}
