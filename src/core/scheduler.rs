//! # RedialScheduler: operator surface of the redial runtime.
//!
//! Owns the queue, the cached retry policy, the event bus and (while active)
//! one [`Worker`]. Everything is driven through `&self` methods so the
//! scheduler can be shared as `Arc<RedialScheduler>` between an HTTP layer,
//! a call-completion hook and the shutdown path.
//!
//! ## Lifecycle
//! ```text
//!            start()                 pause()
//!   Idle ────────────► Running ◄──────────────► Paused
//!     ▲                  │        resume()        │
//!     │                  │ stop()                 │ stop()
//!     │                  ▼                        │
//!     └──── start() ── Stopped ◄──────────────────┘
//! ```
//!
//! ## Event flow
//! ```text
//! Worker / operator calls ── publish(Event) ──► Bus ──► listener ──► SubscriberSet
//! ```
//!
//! ## Shutdown
//! `shutdown()` stops the worker, waits up to `grace` for the in-flight
//! attempt to be recorded, then closes the subscriber workers.

use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::core::{
    builder::SchedulerBuilder,
    shutdown,
    state::{SchedulerStatus, Shared, WorkerHandle},
    worker::Worker,
};
use crate::error::{SchedulerError, StoreError};
use crate::events::{Event, EventKind};
use crate::gateway::GatewayRef;
use crate::intake::{EnqueueOutcome, RedialRequest};
use crate::policies::{PolicyPatch, RetryPolicy};
use crate::queue::{ItemId, QueueStats, RedialItem, RedialStatus};
use crate::subscribers::SubscriberSet;

/// Call-retry scheduler.
///
/// Build one with [`RedialScheduler::builder`].
///
/// ## Example
/// ```rust
/// use redialvisor::{
///     CallOutcome, DialError, DialFn, DialRequest, DialResponse, RedialRequest, RedialScheduler,
/// };
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let gw = DialFn::arc("demo", |req: DialRequest| async move {
///         Ok::<_, DialError>(DialResponse::connected(format!("call-{}", req.attempt)))
///     });
///     let sched = RedialScheduler::builder(gw).build();
///
///     sched
///         .enqueue(RedialRequest::new("c-1", "Ada", "+15550100", "agent-1", CallOutcome::Busy))
///         .await;
///     sched.start().await?;
///     sched.shutdown().await?;
///     Ok(())
/// }
/// ```
pub struct RedialScheduler {
    shared: Arc<Shared>,
    runtime_token: CancellationToken,
    listener: StdMutex<Option<JoinHandle<()>>>,
}

impl RedialScheduler {
    /// Returns a builder dialing through `gateway`.
    pub fn builder(gateway: GatewayRef) -> SchedulerBuilder {
        SchedulerBuilder::new(gateway)
    }

    pub(crate) fn new_internal(shared: Arc<Shared>, subs: SubscriberSet) -> Self {
        let runtime_token = CancellationToken::new();
        let listener = Self::subscriber_listener(&shared, subs, runtime_token.clone());
        Self {
            shared,
            runtime_token,
            listener: StdMutex::new(Some(listener)),
        }
    }

    /// Forwards bus events to the subscriber set until the runtime token is cancelled.
    fn subscriber_listener(
        shared: &Shared,
        subs: SubscriberSet,
        token: CancellationToken,
    ) -> JoinHandle<()> {
        let mut rx = shared.bus.subscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    msg = rx.recv() => match msg {
                        Ok(ev) => subs.emit(ev),
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            warn!(skipped = n, "subscriber listener lagged behind the bus");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                }
            }
            // Deliver what is already buffered before closing the subscribers.
            while let Ok(ev) = rx.try_recv() {
                subs.emit(ev);
            }
            subs.shutdown().await;
        })
    }

    // ---- lifecycle ----

    /// Activates the scheduler.
    ///
    /// Fails with [`SchedulerError::PolicyDisabled`] when the retry policy is
    /// disabled. Calling `start` on an active scheduler clears a pause and
    /// triggers an immediate scan.
    pub async fn start(&self) -> Result<(), SchedulerError> {
        if !self.shared.policy.read().await.enabled {
            return Err(SchedulerError::PolicyDisabled);
        }

        let mut run = self.shared.run.lock().await;
        if run.active {
            if run.paused {
                run.paused = false;
                info!("redial scheduler resumed by start");
                self.shared.bus.publish(Event::new(EventKind::SchedulerResumed));
            }
            self.shared.wake.notify_one();
            return Ok(());
        }

        run.active = true;
        run.paused = false;
        run.stopped = false;
        run.run_id += 1;

        let token = self.runtime_token.child_token();
        let worker = Worker::new(Arc::clone(&self.shared), run.run_id);
        let join = tokio::spawn(worker.run(token.clone()));
        run.worker = Some(WorkerHandle { token, join });

        info!(run_id = run.run_id, "redial scheduler started");
        self.shared.bus.publish(Event::new(EventKind::SchedulerStarted));
        Ok(())
    }

    /// Stops starting new attempts. The in-flight attempt, if any, completes.
    pub async fn pause(&self) -> Result<(), SchedulerError> {
        let mut run = self.shared.run.lock().await;
        if !run.active {
            return Err(SchedulerError::NotRunning);
        }
        if !run.paused {
            run.paused = true;
            info!("redial scheduler paused");
            self.shared.bus.publish(Event::new(EventKind::SchedulerPaused));
        }
        Ok(())
    }

    /// Lifts a pause and scans the queue right away.
    pub async fn resume(&self) -> Result<(), SchedulerError> {
        let mut run = self.shared.run.lock().await;
        if !run.active {
            return Err(SchedulerError::NotRunning);
        }
        if run.paused {
            run.paused = false;
            info!("redial scheduler resumed");
            self.shared.bus.publish(Event::new(EventKind::SchedulerResumed));
        }
        self.shared.wake.notify_one();
        Ok(())
    }

    /// Deactivates the scheduler.
    ///
    /// The worker is cancelled and no further attempt starts. An attempt that
    /// is already in flight still records its result when it returns.
    /// No-op when not active.
    pub async fn stop(&self) {
        let mut run = self.shared.run.lock().await;
        if !run.active {
            return;
        }
        run.active = false;
        run.paused = false;
        run.stopped = true;
        let in_flight = run.current.take();

        if let Some(worker) = run.worker.take() {
            worker.token.cancel();
            run.retired.retain(|h| !h.is_finished());
            run.retired.push(worker.join);
        }

        info!(in_flight = ?in_flight, "redial scheduler stopped");
        let mut ev = Event::new(EventKind::SchedulerStopped);
        if let Some(id) = in_flight {
            ev = ev.with_item(id);
        }
        self.shared.bus.publish(ev);
    }

    /// Stops the scheduler and waits up to `grace` for its workers to exit.
    ///
    /// Subscribers are drained and closed afterwards, whether or not the
    /// grace period was met.
    pub async fn shutdown(&self) -> Result<(), SchedulerError> {
        self.stop().await;

        let grace = self.shared.cfg.grace;
        let retired = std::mem::take(&mut self.shared.run.lock().await.retired);
        let done = async {
            for h in retired {
                let _ = h.await;
            }
        };
        let res = match tokio::time::timeout(grace, done).await {
            Ok(()) => Ok(()),
            Err(_) => {
                let in_flight = self
                    .shared
                    .run
                    .lock()
                    .await
                    .queue
                    .items()
                    .iter()
                    .find(|i| i.status == RedialStatus::Calling)
                    .map(|i| i.id);
                warn!(?grace, ?in_flight, "attempt still in flight after grace period");
                Err(SchedulerError::GraceExceeded { grace, in_flight })
            }
        };

        self.runtime_token.cancel();
        let listener = self.listener.lock().ok().and_then(|mut l| l.take());
        if let Some(h) = listener {
            let _ = h.await;
        }
        res
    }

    /// Waits for SIGINT/SIGTERM (Ctrl-C elsewhere), then runs [`shutdown`](Self::shutdown).
    pub async fn run_until_signal(&self) -> Result<(), SchedulerError> {
        if let Err(e) = shutdown::wait_for_shutdown_signal().await {
            warn!(error = %e, "failed to install signal handlers, shutting down");
        }
        info!("shutdown signal received");
        self.shutdown().await
    }

    // ---- policy ----

    /// Current retry policy.
    pub async fn policy(&self) -> RetryPolicy {
        self.shared.policy.read().await.clone()
    }

    /// Merges `patch` into the policy, applies it and writes it to the store.
    ///
    /// The new policy takes effect immediately. If the store write fails the
    /// in-memory value stays applied and [`SchedulerError::Persist`] is
    /// returned.
    ///
    /// The store write runs on the blocking pool. The policy write guard is
    /// held until it finishes, so concurrent updates reach the store in the
    /// order they were applied.
    pub async fn update_config(&self, patch: PolicyPatch) -> Result<RetryPolicy, SchedulerError> {
        let mut policy = self.shared.policy.write().await;
        let merged = patch.apply(policy.clone())?;
        *policy = merged.clone();

        debug!(policy = ?merged, "retry policy updated");
        self.shared.bus.publish(Event::new(EventKind::PolicyUpdated));
        self.shared.wake.notify_one();

        if let Err(e) = self.persist(merged.clone()).await {
            warn!(error = %e, label = e.as_label(), "retry policy applied but not persisted");
            self.shared.bus.publish(
                Event::new(EventKind::PolicyPersistFailed).with_reason(e.to_string()),
            );
            return Err(SchedulerError::Persist(e));
        }
        Ok(merged)
    }

    async fn persist(&self, policy: RetryPolicy) -> Result<(), StoreError> {
        let store = Arc::clone(&self.shared.store);
        match tokio::task::spawn_blocking(move || store.save(&policy)).await {
            Ok(res) => res,
            Err(join) => Err(std::io::Error::other(format!("policy save task failed: {join}")).into()),
        }
    }

    // ---- queue ----

    /// Adds a contact to the redial queue, or resets it if already queued.
    pub async fn enqueue(&self, req: RedialRequest) -> EnqueueOutcome {
        let policy = self.shared.policy.read().await.clone();
        let phone = req.phone_number.clone();
        let reason = req.reason;

        let req = match req.screen(&policy) {
            Ok(req) => req,
            Err(rejected) => {
                debug!(phone = %phone, reason = rejected.as_str(), "redial request rejected");
                self.shared.bus.publish(
                    Event::new(EventKind::IntakeRejected)
                        .with_phone(phone)
                        .with_reason(rejected.as_str()),
                );
                return EnqueueOutcome::Rejected(rejected);
            }
        };

        let mut run = self.shared.run.lock().await;
        let outcome = run.queue.enqueue(req, &policy, self.shared.clock.now());
        let kind = match outcome {
            EnqueueOutcome::Inserted(_) => EventKind::ItemEnqueued,
            EnqueueOutcome::Reset(_) => EventKind::ItemReset,
            EnqueueOutcome::Rejected(r) => {
                self.shared.bus.publish(
                    Event::new(EventKind::IntakeRejected)
                        .with_phone(phone)
                        .with_reason(r.as_str()),
                );
                return outcome;
            }
        };
        if let Some(item) = outcome.item_id().and_then(|id| run.queue.get(id)) {
            self.shared
                .bus
                .publish(Event::for_item(kind, item).with_reason(reason.as_str()));
        }
        drop(run);

        self.shared.wake.notify_one();
        outcome
    }

    /// Deletes an item regardless of its status.
    ///
    /// Removing the item whose attempt is in flight abandons that attempt:
    /// its result is discarded when it returns.
    pub async fn remove(&self, id: ItemId) -> Result<RedialItem, SchedulerError> {
        let mut run = self.shared.run.lock().await;
        let item = run
            .queue
            .remove(id)
            .ok_or(SchedulerError::ItemNotFound { id })?;
        if run.current == Some(id) {
            debug!(item = %id, "removed item has an attempt in flight");
        }
        self.shared
            .bus
            .publish(Event::for_item(EventKind::ItemRemoved, &item));
        Ok(item)
    }

    /// Aggregate queue statistics.
    pub async fn stats(&self) -> QueueStats {
        self.shared.run.lock().await.queue.stats()
    }

    /// Snapshot of all items in enqueue order.
    pub async fn list_queue(&self) -> Vec<RedialItem> {
        self.shared.run.lock().await.queue.items().to_vec()
    }

    /// Lifecycle state and in-flight item.
    pub async fn status(&self) -> SchedulerStatus {
        self.shared.run.lock().await.status()
    }

    /// Subscribes to the raw event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.shared.bus.subscribe()
    }
}

impl Drop for RedialScheduler {
    fn drop(&mut self) {
        self.runtime_token.cancel();
    }
}
