//! # Shared scheduler state.
//!
//! Everything the control surface and the worker touch lives in [`Shared`]:
//!
//! ```text
//! Shared
//!  ├── policy: RwLock<RetryPolicy>   (cached, written through to the store)
//!  ├── run:    Mutex<RunState>       (queue + run flags + in-flight pointer)
//!  ├── wake:   Notify                (enqueue / resume / policy change)
//!  ├── clock:  SchedulerClock        (tokio-driven UTC for cooldowns)
//!  ├── bus, gateway, store, cfg
//! ```
//!
//! ## Lock order
//! `policy` before `run`, never the other way round. No lock is held across
//! a gateway call.

use std::sync::Arc;

use tokio::sync::{Mutex, Notify, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::core::{clock::SchedulerClock, config::SchedulerConfig};
use crate::error::DialError;
use crate::events::{Bus, Event, EventKind};
use crate::gateway::{DialResponse, GatewayRef};
use crate::policies::RetryPolicy;
use crate::queue::{ItemId, RedialItem, RedialQueue, RedialStatus};
use crate::store::PolicyStore;

/// Coarse lifecycle state reported by [`RedialScheduler::status`](crate::RedialScheduler::status).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerState {
    /// Never started.
    Idle,
    /// Worker is active and dialing when items are eligible.
    Running,
    /// Worker is active but starts no new attempts.
    Paused,
    /// Stopped by the operator.
    Stopped,
}

/// Snapshot of the scheduler lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerStatus {
    pub state: SchedulerState,
    /// Item whose attempt is in flight, if any.
    pub current_item: Option<ItemId>,
}

/// Handle of the running worker task.
pub(crate) struct WorkerHandle {
    pub token: CancellationToken,
    pub join: JoinHandle<()>,
}

/// Mutable run state, guarded by one mutex.
pub(crate) struct RunState {
    pub queue: RedialQueue,
    pub active: bool,
    pub paused: bool,
    pub stopped: bool,
    /// Bumped on every activation; a worker only claims while its id is current.
    pub run_id: u64,
    pub current: Option<ItemId>,
    pub worker: Option<WorkerHandle>,
    /// Stopped workers that may still be finishing an attempt.
    pub retired: Vec<JoinHandle<()>>,
}

impl RunState {
    fn new() -> Self {
        Self {
            queue: RedialQueue::new(),
            active: false,
            paused: false,
            stopped: false,
            run_id: 0,
            current: None,
            worker: None,
            retired: Vec::new(),
        }
    }

    pub fn status(&self) -> SchedulerStatus {
        let state = match (self.active, self.paused, self.stopped) {
            (true, true, _) => SchedulerState::Paused,
            (true, false, _) => SchedulerState::Running,
            (false, _, true) => SchedulerState::Stopped,
            (false, _, false) => SchedulerState::Idle,
        };
        SchedulerStatus {
            state,
            current_item: self.current,
        }
    }
}

/// State shared by the scheduler handle and its worker.
pub(crate) struct Shared {
    pub cfg: SchedulerConfig,
    pub bus: Bus,
    pub gateway: GatewayRef,
    pub store: Arc<dyn PolicyStore>,
    pub policy: RwLock<RetryPolicy>,
    pub run: Mutex<RunState>,
    pub wake: Notify,
    pub clock: SchedulerClock,
}

impl Shared {
    pub fn new(
        cfg: SchedulerConfig,
        bus: Bus,
        gateway: GatewayRef,
        store: Arc<dyn PolicyStore>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            cfg,
            bus,
            gateway,
            store,
            policy: RwLock::new(policy),
            run: Mutex::new(RunState::new()),
            wake: Notify::new(),
            clock: SchedulerClock::new(),
        }
    }

    /// Picks the next item to dial and marks it `calling`.
    ///
    /// Returns `None` when the worker `run_id` is no longer current, the
    /// scheduler is paused, the policy is disabled, an attempt is already in
    /// flight, or nothing is eligible.
    pub async fn claim_next(&self, run_id: u64) -> Option<RedialItem> {
        let policy = self.policy.read().await.clone();
        let mut run = self.run.lock().await;

        if !run.active || run.run_id != run_id || run.paused || !policy.enabled {
            return None;
        }
        if let Some(cur) = run.current {
            if run.queue.contains(cur) {
                return None;
            }
            warn!(item = %cur, "in-flight item no longer queued, clearing");
            run.current = None;
            self.bus
                .publish(Event::new(EventKind::StaleInFlightCleared).with_item(cur));
        }

        let now = self.clock.now();
        let id = run.queue.next_eligible(&policy, now)?.id;
        let item = run.queue.record_attempt_start(id, now)?.clone();
        run.current = Some(id);
        Some(item)
    }

    /// Records the outcome of an attempt and clears the in-flight pointer.
    ///
    /// The attempt budget is read from the policy at completion time, so a
    /// limit changed mid-attempt applies to this result.
    pub async fn finish_attempt(
        &self,
        item: &RedialItem,
        attempt: u32,
        outcome: Result<DialResponse, DialError>,
    ) {
        let policy = self.policy.read().await.clone();
        let mut run = self.run.lock().await;

        if run.current == Some(item.id) {
            run.current = None;
        }

        let (success, detail) = match &outcome {
            Ok(resp) if resp.success => (true, resp.call_id.clone()),
            Ok(resp) => (false, resp.error.clone()),
            Err(e) => (false, Some(e.to_string())),
        };

        let Some(updated) = run
            .queue
            .record_attempt_result(item.id, success, policy.max_attempts)
        else {
            debug!(item = %item.id, attempt, "attempt returned for a removed item");
            self.bus.publish(
                Event::for_item(EventKind::AttemptAbandoned, item).with_attempt(attempt),
            );
            return;
        };

        let kind = match updated.status {
            RedialStatus::Success => EventKind::AttemptSucceeded,
            RedialStatus::MaxAttempts => EventKind::AttemptsExhausted,
            _ => EventKind::AttemptFailed,
        };
        let mut ev = Event::for_item(kind, updated).with_attempt(attempt);
        if kind == EventKind::AttemptFailed {
            ev = ev.with_delay(policy.delay_between_attempts);
        }
        if let Some(detail) = detail {
            ev = ev.with_reason(detail);
        }
        self.bus.publish(ev);
    }
}
