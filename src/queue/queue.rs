//! # The redial queue.
//!
//! Authoritative in-memory set of contacts awaiting retry. All item mutation
//! goes through four operations:
//!
//! ```text
//! enqueue ──► pending ──record_attempt_start──► calling ──record_attempt_result──► pending | success | max_attempts
//!                 ▲                                                                   │
//!                 └─────────────── enqueue (same phone + agent) resets ───────────────┘
//! remove(id) deletes at any point
//! ```
//!
//! ## Rules
//! - At most one item per `(phone_number, agent_id)`.
//! - Eligibility: `pending`, attempts left, cooldown elapsed.
//! - Order: priority numbers first, then fewer attempts, then enqueue order.
//!
//! The queue is a plain `Vec` re-sorted on each scan; redial volume is small.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::intake::{EnqueueOutcome, RedialRequest, RejectReason};
use crate::policies::RetryPolicy;

use super::item::{ItemId, RedialItem, RedialStatus};

/// Queue of contacts awaiting redial.
#[derive(Debug, Default)]
pub struct RedialQueue {
    items: Vec<RedialItem>,
}

impl RedialQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked items (any status).
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Looks up an item by id.
    pub fn get(&self, id: ItemId) -> Option<&RedialItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Returns true if an item with this id is tracked.
    pub fn contains(&self, id: ItemId) -> bool {
        self.get(id).is_some()
    }

    /// All items in enqueue order.
    pub fn items(&self) -> &[RedialItem] {
        &self.items
    }

    fn get_mut(&mut self, id: ItemId) -> Option<&mut RedialItem> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    /// Inserts a contact, or resets the existing item for the same phone and agent.
    ///
    /// A reset puts attempts back to 0, clears the cooldown and marks the item
    /// `pending`. An item that is currently `calling` keeps that status and
    /// its attempt timestamp: the returning attempt is recorded against it and
    /// its cooldown still applies.
    ///
    /// No-op when the policy is disabled.
    pub fn enqueue(
        &mut self,
        req: RedialRequest,
        policy: &RetryPolicy,
        now: DateTime<Utc>,
    ) -> EnqueueOutcome {
        if !policy.enabled {
            return EnqueueOutcome::Rejected(RejectReason::Disabled);
        }

        if let Some(existing) = self.items.iter_mut().find(|i| i.matches(&req)) {
            existing.attempts = 0;
            if existing.status != RedialStatus::Calling {
                existing.status = RedialStatus::Pending;
                existing.last_attempt_at = None;
            }
            existing.contact_id = req.contact_id;
            existing.contact_name = req.contact_name;
            existing.reason = req.reason;
            if req.original_call_id.is_some() {
                existing.original_call_id = req.original_call_id;
            }
            return EnqueueOutcome::Reset(existing.id);
        }

        let item = RedialItem::from_request(req, now);
        let id = item.id;
        self.items.push(item);
        EnqueueOutcome::Inserted(id)
    }

    /// Deletes an item unconditionally, returning it if it existed.
    pub fn remove(&mut self, id: ItemId) -> Option<RedialItem> {
        let pos = self.items.iter().position(|i| i.id == id)?;
        Some(self.items.remove(pos))
    }

    /// Items that may be dialed at `now`, in dialing order.
    pub fn eligible_items(&self, policy: &RetryPolicy, now: DateTime<Utc>) -> Vec<&RedialItem> {
        let mut eligible: Vec<&RedialItem> = self
            .items
            .iter()
            .filter(|i| i.is_eligible(policy, now))
            .collect();
        // Stable sort: equal keys keep enqueue order.
        eligible.sort_by_key(|i| (!policy.is_priority(&i.phone_number), i.attempts));
        eligible
    }

    /// Head of [`eligible_items`](Self::eligible_items).
    pub fn next_eligible(&self, policy: &RetryPolicy, now: DateTime<Utc>) -> Option<&RedialItem> {
        self.eligible_items(policy, now).into_iter().next()
    }

    /// Marks the item `calling` and stamps the attempt time.
    pub fn record_attempt_start(&mut self, id: ItemId, now: DateTime<Utc>) -> Option<&RedialItem> {
        let item = self.get_mut(id)?;
        item.status = RedialStatus::Calling;
        item.last_attempt_at = Some(now);
        Some(item)
    }

    /// Counts the attempt and moves the item to its next status.
    ///
    /// Returns `None` if the item was removed while the attempt was in flight.
    pub fn record_attempt_result(
        &mut self,
        id: ItemId,
        success: bool,
        max_attempts: u32,
    ) -> Option<&RedialItem> {
        let item = self.get_mut(id)?;
        item.attempts = item.attempts.saturating_add(1);
        item.status = if success {
            RedialStatus::Success
        } else if item.attempts >= max_attempts {
            RedialStatus::MaxAttempts
        } else {
            RedialStatus::Pending
        };
        Some(item)
    }

    /// Items currently marked `calling`.
    pub fn calling_count(&self) -> usize {
        self.count(RedialStatus::Calling)
    }

    fn count(&self, status: RedialStatus) -> usize {
        self.items.iter().filter(|i| i.status == status).count()
    }

    /// Aggregate statistics, computed fresh on every call.
    pub fn stats(&self) -> QueueStats {
        let total_queued = self.items.len();
        let total_completed = self.count(RedialStatus::Success);
        let total_failed = self.count(RedialStatus::Failed) + self.count(RedialStatus::MaxAttempts);
        let success_rate = if total_queued == 0 {
            0.0
        } else {
            total_completed as f64 / total_queued as f64
        };
        QueueStats {
            total_queued,
            pending: self.count(RedialStatus::Pending),
            calling: self.count(RedialStatus::Calling),
            total_completed,
            total_failed,
            success_rate,
        }
    }
}

/// Snapshot statistics of the redial queue.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueStats {
    /// Items tracked, any status.
    pub total_queued: usize,
    pub pending: usize,
    pub calling: usize,
    /// Items with status `success`.
    pub total_completed: usize,
    /// Items with status `failed` or `max_attempts`.
    pub total_failed: usize,
    /// `total_completed / total_queued` (0 when the queue is empty).
    pub success_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::CallOutcome;
    use chrono::Duration as ChronoDuration;
    use std::collections::BTreeSet;
    use std::time::Duration;

    fn req(phone: &str) -> RedialRequest {
        RedialRequest::new(format!("contact-{phone}"), "Contact", phone, "agent-1", CallOutcome::Busy)
    }

    fn policy(max_attempts: u32, delay_secs: u64) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            delay_between_attempts: Duration::from_secs(delay_secs),
            ..RetryPolicy::default()
        }
    }

    #[test]
    fn disabled_policy_is_a_silent_no_op() {
        let mut q = RedialQueue::new();
        let off = RetryPolicy {
            enabled: false,
            ..RetryPolicy::default()
        };
        let out = q.enqueue(req("+1000"), &off, Utc::now());
        assert_eq!(out, EnqueueOutcome::Rejected(RejectReason::Disabled));
        assert!(q.is_empty());
    }

    #[test]
    fn re_enqueue_resets_instead_of_duplicating() {
        let mut q = RedialQueue::new();
        let p = policy(3, 0);
        let now = Utc::now();
        let id = q.enqueue(req("+1000"), &p, now).item_id().unwrap();

        {
            let item = q.get_mut(id).unwrap();
            item.attempts = 2;
            item.status = RedialStatus::Failed;
            item.last_attempt_at = Some(now);
        }

        let out = q.enqueue(req("+1000"), &p, now);
        assert_eq!(out, EnqueueOutcome::Reset(id));
        assert_eq!(q.len(), 1);
        let item = q.get(id).unwrap();
        assert_eq!(item.attempts, 0);
        assert_eq!(item.status, RedialStatus::Pending);
        assert!(item.last_attempt_at.is_none());
    }

    #[test]
    fn re_enqueue_while_calling_keeps_cooldown() {
        let mut q = RedialQueue::new();
        let p = policy(3, 300);
        let now = Utc::now();
        let id = q.enqueue(req("+1000"), &p, now).item_id().unwrap();
        q.record_attempt_start(id, now);

        assert_eq!(q.enqueue(req("+1000"), &p, now), EnqueueOutcome::Reset(id));
        let item = q.get(id).unwrap();
        assert_eq!(item.status, RedialStatus::Calling);
        assert_eq!(item.last_attempt_at, Some(now));

        let item = q.record_attempt_result(id, false, p.max_attempts).unwrap();
        assert_eq!((item.attempts, item.status), (1, RedialStatus::Pending));
        assert!(q.eligible_items(&p, now + ChronoDuration::seconds(10)).is_empty());
        assert_eq!(q.eligible_items(&p, now + ChronoDuration::seconds(301)).len(), 1);
    }

    #[test]
    fn same_phone_different_agent_is_a_separate_item() {
        let mut q = RedialQueue::new();
        let p = policy(3, 0);
        q.enqueue(req("+1000"), &p, Utc::now());
        let mut other = req("+1000");
        other.agent_id = "agent-2".into();
        assert!(matches!(
            q.enqueue(other, &p, Utc::now()),
            EnqueueOutcome::Inserted(_)
        ));
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn cooldown_gates_eligibility() {
        let mut q = RedialQueue::new();
        let p = policy(3, 300);
        let now = Utc::now();
        let id = q.enqueue(req("+1000"), &p, now).item_id().unwrap();
        q.record_attempt_start(id, now);
        q.record_attempt_result(id, false, p.max_attempts);

        assert!(q.eligible_items(&p, now + ChronoDuration::seconds(100)).is_empty());
        let later = q.eligible_items(&p, now + ChronoDuration::seconds(301));
        assert_eq!(later.len(), 1);
        assert_eq!(later[0].id, id);
    }

    #[test]
    fn priority_dominates_attempt_count() {
        let mut q = RedialQueue::new();
        let mut p = policy(5, 0);
        p.priority_numbers = BTreeSet::from(["+2000".to_string()]);
        let now = Utc::now();

        let plain = q.enqueue(req("+1000"), &p, now).item_id().unwrap();
        let vip = q.enqueue(req("+2000"), &p, now).item_id().unwrap();
        for _ in 0..2 {
            q.record_attempt_start(vip, now);
            q.record_attempt_result(vip, false, p.max_attempts);
        }

        let order: Vec<ItemId> = q.eligible_items(&p, now).iter().map(|i| i.id).collect();
        assert_eq!(order, vec![vip, plain]);
    }

    #[test]
    fn fewer_attempts_first_then_enqueue_order() {
        let mut q = RedialQueue::new();
        let p = policy(5, 0);
        let now = Utc::now();
        let a = q.enqueue(req("+1000"), &p, now).item_id().unwrap();
        let b = q.enqueue(req("+2000"), &p, now).item_id().unwrap();
        let c = q.enqueue(req("+3000"), &p, now).item_id().unwrap();
        q.record_attempt_start(a, now);
        q.record_attempt_result(a, false, p.max_attempts);

        let order: Vec<ItemId> = q.eligible_items(&p, now).iter().map(|i| i.id).collect();
        assert_eq!(order, vec![b, c, a]);
    }

    #[test]
    fn result_transitions() {
        let mut q = RedialQueue::new();
        let p = policy(2, 0);
        let now = Utc::now();
        let id = q.enqueue(req("+1000"), &p, now).item_id().unwrap();

        q.record_attempt_start(id, now);
        assert_eq!(q.get(id).unwrap().status, RedialStatus::Calling);
        assert_eq!(q.calling_count(), 1);
        assert!(q.eligible_items(&p, now).is_empty());

        let item = q.record_attempt_result(id, false, p.max_attempts).unwrap();
        assert_eq!((item.attempts, item.status), (1, RedialStatus::Pending));

        q.record_attempt_start(id, now);
        let item = q.record_attempt_result(id, false, p.max_attempts).unwrap();
        assert_eq!((item.attempts, item.status), (2, RedialStatus::MaxAttempts));
        assert!(q.eligible_items(&p, now).is_empty());
    }

    #[test]
    fn removed_item_result_is_ignored() {
        let mut q = RedialQueue::new();
        let p = policy(3, 0);
        let id = q.enqueue(req("+1000"), &p, Utc::now()).item_id().unwrap();
        q.record_attempt_start(id, Utc::now());
        assert!(q.remove(id).is_some());
        assert!(q.record_attempt_result(id, true, 3).is_none());
        assert!(q.is_empty());
    }

    #[test]
    fn stats_are_derived_from_statuses() {
        let mut q = RedialQueue::new();
        let p = policy(1, 0);
        let now = Utc::now();
        let ok = q.enqueue(req("+1000"), &p, now).item_id().unwrap();
        let ko = q.enqueue(req("+2000"), &p, now).item_id().unwrap();
        q.enqueue(req("+3000"), &p, now);
        q.enqueue(req("+4000"), &p, now);

        q.record_attempt_start(ok, now);
        q.record_attempt_result(ok, true, 1);
        q.record_attempt_start(ko, now);
        q.record_attempt_result(ko, false, 1);

        let stats = q.stats();
        assert_eq!(stats.total_queued, 4);
        assert_eq!(stats.total_completed, 1);
        assert_eq!(stats.total_failed, 1);
        assert_eq!(stats.pending, 2);
        assert!((stats.success_rate - 0.25).abs() < f64::EPSILON);
        assert_eq!(RedialQueue::new().stats().success_rate, 0.0);
    }
}
