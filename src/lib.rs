//! # redialvisor
//!
//! **Redialvisor** is an automatic call-retry scheduler.
//!
//! Calls that end busy, unanswered or failed are put into a redial queue.
//! A single background worker periodically picks the most urgent eligible
//! contact and places one outbound call through a [`DialGateway`], honoring
//! a per-contact attempt budget, a cooldown between attempts and a priority
//! list. Operators start, pause, resume and stop the worker, edit the retry
//! policy (written through to a [`PolicyStore`]) and inspect the queue.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   call-completion hook      operator (HTTP/UI)
//!          │ enqueue()          │ start/pause/resume/stop, update_config, remove
//!          ▼                    ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  RedialScheduler                                                  │
//! │  - RetryPolicy (cached, write-through to PolicyStore)             │
//! │  - RedialQueue (items, statuses, stats)                           │
//! │  - run flags + in-flight pointer                                  │
//! └──────┬──────────────────────────────────────────────────┬─────────┘
//!        │ spawn on start()                                 │ publish
//!        ▼                                                  │
//!   ┌──────────────┐   place_call()   ┌──────────────┐      │
//!   │    Worker    │ ───────────────► │ DialGateway  │      │
//!   │ (tick/drain) │ ◄─────────────── │  (provider)  │      │
//!   └──────┬───────┘   DialResponse   └──────────────┘      │
//!          │ publish                                        │
//!          ▼                                                ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        Bus (broadcast channel)                    │
//! │               (capacity: SchedulerConfig::bus_capacity)           │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                       ┌────────────────────────┐
//!                       │  subscriber listener   │
//!                       └───────────┬────────────┘
//!                                   ▼
//!                             SubscriberSet
//!                          (per-sub queues)
//!                       ┌───────────┼───────────┐
//!                       ▼           ▼           ▼
//!                   LogWriter     audit      UI push
//! ```
//!
//! ### One activation
//! ```text
//! start() ──► Worker::run()
//!
//! loop {
//!   ├─► wait: tick | wake (enqueue, resume, policy change) | cancelled → exit
//!   └─► drain:
//!         ├─ skip if paused, policy disabled or an attempt is in flight
//!         ├─ pick next eligible: priority first, then fewest attempts, then FIFO
//!         ├─ mark calling, publish AttemptStarting
//!         ├─ dial_once(gateway, timeout)
//!         │     ├─ connected       ─► Success            (AttemptSucceeded)
//!         │     ├─ failed, budget  ─► Pending + cooldown (AttemptFailed)
//!         │     └─ failed, no more ─► MaxAttempts        (AttemptsExhausted)
//!         ├─ sleep(pacing) (cancellable)
//!         └─ repeat until nothing is eligible
//! }
//! ```
//!
//! ## Features
//! | Area              | Description                                                     | Key types / traits                          |
//! |-------------------|-----------------------------------------------------------------|---------------------------------------------|
//! | **Scheduling**    | Lifecycle and operator surface.                                 | [`RedialScheduler`], [`SchedulerBuilder`]   |
//! | **Queue**         | Tracked contacts, eligibility, statistics.                      | [`RedialQueue`], [`RedialItem`], [`QueueStats`] |
//! | **Intake**        | Filtering and validation of redial requests.                    | [`RedialRequest`], [`CallOutcome`]          |
//! | **Policies**      | Attempt budget, cooldown, priority list; pacing jitter.         | [`RetryPolicy`], [`PolicyPatch`], [`JitterPolicy`] |
//! | **Persistence**   | Durable retry policy.                                           | [`PolicyStore`], [`JsonFileStore`]          |
//! | **Gateway**       | Outbound call boundary.                                         | [`DialGateway`], [`DialFn`]                 |
//! | **Subscriber API**| Hook into scheduler events (logging, audit, live views).        | [`Subscribe`]                               |
//! | **Errors**        | Typed errors for commands, storage and dialing.                 | [`SchedulerError`], [`StoreError`], [`DialError`] |
//!
//! ## Optional features
//! - `logging` (default): exports the built-in [`LogWriter`] subscriber.
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use redialvisor::{
//!     CallOutcome, DialError, DialFn, DialRequest, DialResponse, JsonFileStore, RedialRequest,
//!     RedialScheduler, SchedulerConfig,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gateway = DialFn::arc("provider", |req: DialRequest| async move {
//!         // Call the voice provider here.
//!         Ok::<_, DialError>(DialResponse::failed(format!("{} busy", req.phone_number)))
//!     });
//!
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn redialvisor::Subscribe>> =
//!         vec![Arc::new(redialvisor::LogWriter::new())];
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn redialvisor::Subscribe>> = Vec::new();
//!
//!     let sched = RedialScheduler::builder(gateway)
//!         .with_config(SchedulerConfig::default())
//!         .with_store(Arc::new(JsonFileStore::new("data/redial-config.json")))
//!         .with_subscribers(subs)
//!         .build();
//!
//!     sched
//!         .enqueue(RedialRequest::new("c-42", "Ada", "+15550100", "agent-7", CallOutcome::Busy))
//!         .await;
//!     sched.start().await?;
//!
//!     // Runs until SIGINT/SIGTERM, then waits for the in-flight attempt.
//!     sched.run_until_signal().await?;
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod gateway;
mod intake;
mod policies;
mod queue;
mod store;
mod subscribers;

// ---- Public re-exports ----

pub use core::{
    RedialScheduler, SchedulerBuilder, SchedulerConfig, SchedulerState, SchedulerStatus,
    wait_for_shutdown_signal,
};
pub use error::{DialError, SchedulerError, StoreError};
pub use events::{Bus, Event, EventKind};
pub use gateway::{DialFn, DialGateway, DialRequest, DialResponse, GatewayRef};
pub use intake::{CallOutcome, EnqueueOutcome, RedialRequest, RejectReason};
pub use policies::{JitterPolicy, PolicyPatch, RetryPolicy};
pub use queue::{ItemId, QueueStats, RedialItem, RedialQueue, RedialStatus};
pub use store::{JsonFileStore, MemoryStore, PolicyStore, load_or_default};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: built-in subscriber forwarding events to `tracing`.
// Enabled by default; disable with `--no-default-features`.
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
