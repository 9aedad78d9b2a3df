//! JSON file policy store.

use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::policies::RetryPolicy;

use super::PolicyStore;

/// Keeps the retry policy in a single JSON file.
///
/// Saves go through a temp file and a rename, so readers never observe a
/// half-written record.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store backed by `path` (the file does not need to exist yet).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PolicyStore for JsonFileStore {
    fn load(&self) -> Result<RetryPolicy, StoreError> {
        if !self.path.exists() {
            return Ok(RetryPolicy::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        let policy: RetryPolicy = serde_json::from_str(&content)?;
        Ok(policy)
    }

    fn save(&self, policy: &RetryPolicy) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let temp_path = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(policy)?;
        std::fs::write(&temp_path, content)?;
        std::fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("redial-policy.json"));
        assert_eq!(store.load().unwrap(), RetryPolicy::default());
    }

    #[test]
    fn saved_policy_survives_a_new_store_instance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("redial-policy.json");

        let policy = RetryPolicy {
            max_attempts: 5,
            delay_between_attempts: Duration::from_secs(90),
            enabled: false,
            ..RetryPolicy::default()
        };
        JsonFileStore::new(&path).save(&policy).unwrap();

        let reloaded = JsonFileStore::new(&path).load().unwrap();
        assert_eq!(reloaded, policy);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn corrupt_file_is_a_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("redial-policy.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert_eq!(err.as_label(), "store_json");
    }
}
