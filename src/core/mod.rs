//! Runtime core: worker loop and lifecycle.
//!
//! The public API from this module is [`RedialScheduler`] (with its
//! [`SchedulerBuilder`] and [`SchedulerConfig`]), which owns the queue, runs the
//! worker and handles graceful shutdown.
//!
//! Internal modules:
//! - [`dialer`]: executes one attempt with timeout and panic isolation;
//! - [`worker`]: tick/wake loop that drains eligible items sequentially;
//! - [`state`]: queue, run flags and in-flight pointer behind one lock;
//! - [`clock`]: UTC timestamps driven by the tokio clock;
//! - [`shutdown`]: cross-platform shutdown signal handling.

mod builder;
mod clock;
mod config;
mod dialer;
mod scheduler;
mod shutdown;
mod state;
mod worker;


pub use builder::SchedulerBuilder;
pub use config::SchedulerConfig;
pub use scheduler::RedialScheduler;
pub use shutdown::wait_for_shutdown_signal;
pub use state::{SchedulerState, SchedulerStatus};
