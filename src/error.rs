//! Error types used by the redial scheduler, the policy store and dial gateways.
//!
//! This module defines three error enums:
//!
//! - [`SchedulerError`]: errors reported synchronously to operator commands.
//! - [`StoreError`]: failures of the durable policy store.
//! - [`DialError`]: failures of a single dial attempt.
//!
//! All of them provide `as_label` (stable snake_case for logs/metrics) and
//! `as_message` helpers.

use std::time::Duration;
use thiserror::Error;

use crate::queue::ItemId;

/// # Errors returned by the operator control surface.
///
/// None of these are fatal: the scheduler keeps running (or stays idle)
/// and the caller decides what to show the operator.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SchedulerError {
    /// `start()` was called while the retry policy is disabled.
    #[error("retry policy is disabled")]
    PolicyDisabled,

    /// A command that needs an active scheduler was sent to an idle one.
    #[error("scheduler is not running")]
    NotRunning,

    /// A policy update was rejected before being applied.
    #[error("invalid retry policy: {reason}")]
    InvalidPolicy {
        /// What was wrong with the update.
        reason: String,
    },

    /// No queued item carries this id.
    #[error("redial item {id} not found")]
    ItemNotFound {
        /// The id that was looked up.
        id: ItemId,
    },

    /// The policy was applied in memory but could not be persisted.
    #[error("policy not persisted: {0}")]
    Persist(#[from] StoreError),

    /// The worker did not exit within the shutdown grace period.
    #[error("shutdown timeout {grace:?} exceeded; in-flight item: {in_flight:?}")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Item that was still being dialed, if any.
        in_flight: Option<ItemId>,
    },
}

impl SchedulerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use redialvisor::SchedulerError;
    ///
    /// assert_eq!(SchedulerError::PolicyDisabled.as_label(), "scheduler_policy_disabled");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SchedulerError::PolicyDisabled => "scheduler_policy_disabled",
            SchedulerError::NotRunning => "scheduler_not_running",
            SchedulerError::InvalidPolicy { .. } => "scheduler_invalid_policy",
            SchedulerError::ItemNotFound { .. } => "scheduler_item_not_found",
            SchedulerError::Persist(_) => "scheduler_persist_failed",
            SchedulerError::GraceExceeded { .. } => "scheduler_grace_exceeded",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SchedulerError::PolicyDisabled => "enable the retry policy before starting".to_string(),
            SchedulerError::NotRunning => "start the scheduler first".to_string(),
            SchedulerError::InvalidPolicy { reason } => format!("invalid policy: {reason}"),
            SchedulerError::ItemNotFound { id } => format!("unknown item: {id}"),
            SchedulerError::Persist(e) => format!("persist: {}", e.as_message()),
            SchedulerError::GraceExceeded { grace, in_flight } => {
                format!("grace exceeded after {grace:?}; in-flight={in_flight:?}")
            }
        }
    }
}

/// # Errors produced by a [`PolicyStore`](crate::PolicyStore).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted record could not be encoded or decoded.
    #[error("invalid policy record: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            StoreError::Io(_) => "store_io",
            StoreError::Json(_) => "store_json",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            StoreError::Io(e) => format!("io: {e}"),
            StoreError::Json(e) => format!("json: {e}"),
        }
    }
}

/// # Errors produced by one dial attempt.
///
/// The scheduler treats every variant the same way: the attempt counts as
/// failed. The variants only exist so events and logs say *why*.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DialError {
    /// The gateway did not answer within the dial timeout.
    #[error("timed out after {timeout:?}")]
    Timeout {
        /// The timeout duration that was exceeded.
        timeout: Duration,
    },

    /// The gateway returned an error (busy, no answer, network, provider).
    #[error("dial failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The gateway future panicked.
    #[error("gateway panicked: {info}")]
    Panicked {
        /// Panic payload, when it was a string.
        info: String,
    },
}

impl DialError {
    /// Shorthand for [`DialError::Fail`].
    pub fn fail(error: impl Into<String>) -> Self {
        DialError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use redialvisor::DialError;
    /// use std::time::Duration;
    ///
    /// let err = DialError::Timeout { timeout: Duration::from_secs(30) };
    /// assert_eq!(err.as_label(), "dial_timeout");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DialError::Timeout { .. } => "dial_timeout",
            DialError::Fail { .. } => "dial_failed",
            DialError::Panicked { .. } => "dial_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            DialError::Timeout { timeout } => format!("timeout: {timeout:?}"),
            DialError::Fail { error } => format!("error: {error}"),
            DialError::Panicked { info } => format!("panic: {info}"),
        }
    }
}

/// Extracts a readable message from a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persist_error_wraps_store_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: SchedulerError = StoreError::from(io).into();
        assert_eq!(err.as_label(), "scheduler_persist_failed");
        assert!(err.as_message().contains("read-only"));
    }

    #[test]
    fn dial_error_labels_are_stable() {
        assert_eq!(DialError::fail("busy").as_label(), "dial_failed");
        assert_eq!(
            DialError::Panicked { info: "boom".into() }.as_label(),
            "dial_panicked"
        );
        assert_eq!(DialError::fail("busy").to_string(), "dial failed: busy");
    }
}
