//! # Failed-call intake.
//!
//! The only way work enters the redial queue. Campaign handlers report a call
//! that did not connect, operators add a contact by hand; both build a
//! [`RedialRequest`] and hand it to
//! [`RedialScheduler::enqueue`](crate::RedialScheduler::enqueue).
//!
//! Screening happens here, before the queue sees the request:
//! - policy disabled → [`RejectReason::Disabled`]
//! - `only_failed_calls` and a [`CallOutcome::Completed`] call → [`RejectReason::Filtered`]
//! - blank phone number → [`RejectReason::InvalidPhone`]

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::policies::RetryPolicy;
use crate::queue::ItemId;

/// Why a contact is being submitted for redial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallOutcome {
    /// Line was busy.
    Busy,
    /// Rang out without an answer.
    NoAnswer,
    /// Provider or network error.
    Failed,
    /// The call connected but the campaign still wants a follow-up.
    Completed,
    /// Operator "add to redial" action.
    Manual,
}

impl CallOutcome {
    /// True for outcomes where the call never reached the contact.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            CallOutcome::Busy | CallOutcome::NoAnswer | CallOutcome::Failed
        )
    }

    /// Stable snake_case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CallOutcome::Busy => "busy",
            CallOutcome::NoAnswer => "no_answer",
            CallOutcome::Failed => "failed",
            CallOutcome::Completed => "completed",
            CallOutcome::Manual => "manual",
        }
    }
}

impl fmt::Display for CallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contact submitted for redial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedialRequest {
    pub contact_id: String,
    pub contact_name: String,
    pub phone_number: String,
    pub agent_id: String,
    pub reason: CallOutcome,
    /// Call that originally failed, for traceability.
    #[serde(default)]
    pub original_call_id: Option<String>,
}

impl RedialRequest {
    /// Creates a request without an original call reference.
    pub fn new(
        contact_id: impl Into<String>,
        contact_name: impl Into<String>,
        phone_number: impl Into<String>,
        agent_id: impl Into<String>,
        reason: CallOutcome,
    ) -> Self {
        Self {
            contact_id: contact_id.into(),
            contact_name: contact_name.into(),
            phone_number: phone_number.into(),
            agent_id: agent_id.into(),
            reason,
            original_call_id: None,
        }
    }

    /// Attaches the id of the call that failed.
    pub fn with_original_call(mut self, call_id: impl Into<String>) -> Self {
        self.original_call_id = Some(call_id.into());
        self
    }

    /// Applies the intake rules of `policy`, returning the trimmed request.
    pub(crate) fn screen(mut self, policy: &RetryPolicy) -> Result<Self, RejectReason> {
        if !policy.enabled {
            return Err(RejectReason::Disabled);
        }
        if policy.only_failed_calls && self.reason == CallOutcome::Completed {
            return Err(RejectReason::Filtered);
        }
        self.phone_number = self.phone_number.trim().to_string();
        self.agent_id = self.agent_id.trim().to_string();
        if self.phone_number.is_empty() {
            return Err(RejectReason::InvalidPhone);
        }
        Ok(self)
    }
}

/// Why intake refused a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Retry policy is disabled.
    Disabled,
    /// `only_failed_calls` is set and the call connected.
    Filtered,
    /// Phone number was blank.
    InvalidPhone,
}

impl RejectReason {
    /// Stable snake_case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::Disabled => "policy_disabled",
            RejectReason::Filtered => "not_a_failed_call",
            RejectReason::InvalidPhone => "invalid_phone",
        }
    }
}

/// Result of [`RedialScheduler::enqueue`](crate::RedialScheduler::enqueue).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// A new item was created.
    Inserted(ItemId),
    /// The contact was already queued; its attempts were reset.
    Reset(ItemId),
    /// Nothing changed.
    Rejected(RejectReason),
}

impl EnqueueOutcome {
    /// Id of the queued item, unless the request was rejected.
    pub fn item_id(&self) -> Option<ItemId> {
        match self {
            EnqueueOutcome::Inserted(id) | EnqueueOutcome::Reset(id) => Some(*id),
            EnqueueOutcome::Rejected(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(reason: CallOutcome) -> RedialRequest {
        RedialRequest::new("c-1", "Ada", " +15550100 ", "agent-1", reason)
    }

    #[test]
    fn completed_calls_are_filtered_when_only_failed() {
        let policy = RetryPolicy::default();
        assert_eq!(
            request(CallOutcome::Completed).screen(&policy),
            Err(RejectReason::Filtered)
        );

        let open = RetryPolicy {
            only_failed_calls: false,
            ..RetryPolicy::default()
        };
        assert!(request(CallOutcome::Completed).screen(&open).is_ok());
    }

    #[test]
    fn disabled_policy_rejects_everything() {
        let policy = RetryPolicy {
            enabled: false,
            ..RetryPolicy::default()
        };
        assert_eq!(
            request(CallOutcome::Busy).screen(&policy),
            Err(RejectReason::Disabled)
        );
    }

    #[test]
    fn phone_is_trimmed_and_blank_rejected() {
        let policy = RetryPolicy::default();
        let ok = request(CallOutcome::NoAnswer).screen(&policy).unwrap();
        assert_eq!(ok.phone_number, "+15550100");

        let blank = RedialRequest::new("c-2", "Bob", "   ", "agent-1", CallOutcome::Busy);
        assert_eq!(blank.screen(&policy), Err(RejectReason::InvalidPhone));
    }

    #[test]
    fn manual_requests_pass_the_failed_only_filter() {
        assert!(request(CallOutcome::Manual).screen(&RetryPolicy::default()).is_ok());
        assert!(!CallOutcome::Manual.is_failure());
        assert!(CallOutcome::NoAnswer.is_failure());
    }
}
