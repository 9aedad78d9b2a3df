//! Redial item data model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::intake::{CallOutcome, RedialRequest};
use crate::policies::RetryPolicy;

/// Opaque identifier of a queued contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Generates a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle status of a redial item.
///
/// ```text
/// pending ──start──► calling ──ok──────────────► success
///    ▲                  │
///    └──fail, budget────┤
///                       └──fail, budget spent──► max_attempts
/// ```
///
/// `failed` belongs to the status vocabulary shared with the dashboard; the
/// worker itself moves exhausted items to `max_attempts`. Both count as
/// failed in [`QueueStats`](super::QueueStats).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedialStatus {
    Pending,
    Calling,
    Success,
    Failed,
    MaxAttempts,
}

impl RedialStatus {
    /// True when no further attempt will be made for this item.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RedialStatus::Success | RedialStatus::Failed | RedialStatus::MaxAttempts
        )
    }
}

/// One tracked contact.
///
/// Items are handed out as clones; only [`RedialQueue`](super::RedialQueue)
/// mutates the originals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedialItem {
    pub id: ItemId,
    pub contact_id: String,
    pub contact_name: String,
    pub phone_number: String,
    pub agent_id: String,
    /// Attempts made so far (`<= max_attempts` of the policy in force).
    pub attempts: u32,
    pub last_attempt_at: Option<DateTime<Utc>>,
    pub status: RedialStatus,
    pub original_call_id: Option<String>,
    /// Outcome that put the contact into the queue.
    pub reason: CallOutcome,
    pub enqueued_at: DateTime<Utc>,
}

impl RedialItem {
    pub(crate) fn from_request(req: RedialRequest, now: DateTime<Utc>) -> Self {
        Self {
            id: ItemId::new(),
            contact_id: req.contact_id,
            contact_name: req.contact_name,
            phone_number: req.phone_number,
            agent_id: req.agent_id,
            attempts: 0,
            last_attempt_at: None,
            status: RedialStatus::Pending,
            original_call_id: req.original_call_id,
            reason: req.reason,
            enqueued_at: now,
        }
    }

    /// True if this item and `req` describe the same (phone, agent) pair.
    pub(crate) fn matches(&self, req: &RedialRequest) -> bool {
        self.phone_number == req.phone_number && self.agent_id == req.agent_id
    }

    /// True once the cooldown after the last attempt has elapsed.
    pub fn is_cooled_down(&self, policy: &RetryPolicy, now: DateTime<Utc>) -> bool {
        let Some(last) = self.last_attempt_at else {
            return true;
        };
        match (now - last).to_std() {
            Ok(elapsed) => elapsed >= policy.delay_between_attempts,
            // Clock went backwards: only a zero cooldown is satisfied.
            Err(_) => policy.delay_between_attempts.is_zero(),
        }
    }

    /// True if the item may be dialed right now under `policy`.
    pub fn is_eligible(&self, policy: &RetryPolicy, now: DateTime<Utc>) -> bool {
        self.status == RedialStatus::Pending
            && self.attempts < policy.max_attempts
            && self.is_cooled_down(policy, now)
    }
}
