//! # Retry policy for failed outbound calls.
//!
//! [`RetryPolicy`] decides **whether** a contact may be dialed again and
//! **when**:
//! - [`RetryPolicy::max_attempts`] bounds the total number of attempts;
//! - [`RetryPolicy::delay_between_attempts`] is the cooldown after each attempt;
//! - [`RetryPolicy::priority_numbers`] jump ahead of every other contact.
//!
//! The persisted JSON layout uses camelCase keys and whole seconds for the delay:
//! ```json
//! {"maxAttempts":3,"delayBetweenAttempts":300,"enabled":true,"onlyFailedCalls":true,"priorityNumbers":[]}
//! ```
//!
//! Policies are changed only through [`PolicyPatch`], merged by
//! [`RedialScheduler::update_config`](crate::RedialScheduler::update_config).

use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SchedulerError;

/// Retry policy.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use redialvisor::RetryPolicy;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.max_attempts, 3);
/// assert_eq!(policy.delay_between_attempts, Duration::from_secs(300));
/// assert!(policy.enabled);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetryPolicy {
    /// Total attempts allowed per contact (`>= 1`).
    pub max_attempts: u32,
    /// Minimum wait after an attempt before the same contact is eligible again.
    #[serde(with = "duration_secs")]
    pub delay_between_attempts: Duration,
    /// Master switch: intake and scheduling only happen while `true`.
    pub enabled: bool,
    /// Intake accepts only failed call outcomes when `true`.
    pub only_failed_calls: bool,
    /// Phone numbers dialed ahead of everyone else.
    pub priority_numbers: BTreeSet<String>,
}

impl Default for RetryPolicy {
    /// Returns a policy with:
    /// - `max_attempts = 3`;
    /// - `delay_between_attempts = 300s`;
    /// - `enabled = true`, `only_failed_calls = true`;
    /// - empty priority list.
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_between_attempts: Duration::from_secs(300),
            enabled: true,
            only_failed_calls: true,
            priority_numbers: BTreeSet::new(),
        }
    }
}

impl RetryPolicy {
    /// Returns true if `phone` is on the priority list.
    pub fn is_priority(&self, phone: &str) -> bool {
        self.priority_numbers.contains(phone.trim())
    }

    /// Clamps values that a hand-edited record could carry out of range.
    pub(crate) fn sanitized(mut self) -> Self {
        self.max_attempts = self.max_attempts.max(1);
        self.priority_numbers = normalize_numbers(self.priority_numbers);
        self
    }
}

/// Partial update of a [`RetryPolicy`]; `None` fields keep their current value.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use redialvisor::{PolicyPatch, RetryPolicy};
///
/// let patch = PolicyPatch {
///     max_attempts: Some(5),
///     delay_between_attempts: Some(Duration::from_secs(60)),
///     ..PolicyPatch::default()
/// };
/// let merged = patch.apply(RetryPolicy::default()).unwrap();
/// assert_eq!(merged.max_attempts, 5);
/// assert!(merged.enabled);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicyPatch {
    pub max_attempts: Option<u32>,
    #[serde(with = "opt_duration_secs")]
    pub delay_between_attempts: Option<Duration>,
    pub enabled: Option<bool>,
    pub only_failed_calls: Option<bool>,
    /// Replaces the whole priority list.
    pub priority_numbers: Option<BTreeSet<String>>,
}

impl PolicyPatch {
    /// Merges this patch into `base`.
    ///
    /// Fails with [`SchedulerError::InvalidPolicy`] when `max_attempts` is `0`.
    pub fn apply(self, mut base: RetryPolicy) -> Result<RetryPolicy, SchedulerError> {
        if let Some(max) = self.max_attempts {
            if max == 0 {
                return Err(SchedulerError::InvalidPolicy {
                    reason: "maxAttempts must be at least 1".to_string(),
                });
            }
            base.max_attempts = max;
        }
        if let Some(delay) = self.delay_between_attempts {
            base.delay_between_attempts = delay;
        }
        if let Some(enabled) = self.enabled {
            base.enabled = enabled;
        }
        if let Some(only_failed) = self.only_failed_calls {
            base.only_failed_calls = only_failed;
        }
        if let Some(numbers) = self.priority_numbers {
            base.priority_numbers = normalize_numbers(numbers);
        }
        Ok(base)
    }
}

fn normalize_numbers(numbers: BTreeSet<String>) -> BTreeSet<String> {
    numbers
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect()
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}

mod opt_duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match d {
            Some(d) => s.serialize_some(&d.as_secs()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persisted_layout_uses_camel_case_and_seconds() {
        let policy = RetryPolicy {
            max_attempts: 4,
            delay_between_attempts: Duration::from_secs(120),
            enabled: false,
            only_failed_calls: true,
            priority_numbers: BTreeSet::from(["+15550100".to_string()]),
        };
        let json = serde_json::to_value(&policy).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "maxAttempts": 4,
                "delayBetweenAttempts": 120,
                "enabled": false,
                "onlyFailedCalls": true,
                "priorityNumbers": ["+15550100"],
            })
        );
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let policy: RetryPolicy = serde_json::from_str(r#"{"maxAttempts":7}"#).unwrap();
        assert_eq!(policy.max_attempts, 7);
        assert_eq!(policy.delay_between_attempts, Duration::from_secs(300));
        assert!(policy.enabled);
    }

    #[test]
    fn patch_rejects_zero_attempts() {
        let patch = PolicyPatch {
            max_attempts: Some(0),
            ..PolicyPatch::default()
        };
        let err = patch.apply(RetryPolicy::default()).unwrap_err();
        assert_eq!(err.as_label(), "scheduler_invalid_policy");
    }

    #[test]
    fn patch_replaces_priority_list_and_trims_numbers() {
        let patch = PolicyPatch {
            priority_numbers: Some(BTreeSet::from([" +15550100 ".to_string(), "".to_string()])),
            ..PolicyPatch::default()
        };
        let merged = patch.apply(RetryPolicy::default()).unwrap();
        assert_eq!(merged.priority_numbers.len(), 1);
        assert!(merged.is_priority("+15550100"));
    }

    #[test]
    fn sanitize_clamps_attempts() {
        let policy = RetryPolicy {
            max_attempts: 0,
            ..RetryPolicy::default()
        }
        .sanitized();
        assert_eq!(policy.max_attempts, 1);
    }
}
