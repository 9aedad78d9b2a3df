//! # One dial attempt.
//!
//! Calls the gateway once with an optional timeout and turns every way the
//! call can go wrong into a [`DialError`]:
//!
//! ```text
//! place_call() → Ok(resp)            → Ok(resp)   (resp.success decides the outcome)
//!              → Err(e)              → Err(e)
//!              → panic               → Err(Panicked)
//! timeout exceeded → publish DialTimeout → Err(Timeout)
//! ```
//!
//! ## Rules
//! - Never retries; one call per invocation.
//! - Never propagates a panic out of the worker.
//! - The call is **not** raced against the stop token: an attempt that reached
//!   the provider always comes back and gets recorded.

use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use tokio::time;

use crate::error::{DialError, panic_message};
use crate::events::{Bus, Event, EventKind};
use crate::gateway::{DialGateway, DialRequest, DialResponse};
use crate::queue::RedialItem;

/// Places one call for `item` as attempt number `attempt`.
pub(crate) async fn dial_once(
    gateway: &dyn DialGateway,
    item: &RedialItem,
    attempt: u32,
    timeout: Option<Duration>,
    bus: &Bus,
) -> Result<DialResponse, DialError> {
    let req = DialRequest {
        agent_id: item.agent_id.clone(),
        phone_number: item.phone_number.clone(),
        contact_name: item.contact_name.clone(),
        attempt,
    };
    let call = AssertUnwindSafe(gateway.place_call(req)).catch_unwind();

    let res = match timeout {
        Some(dur) => match time::timeout(dur, call).await {
            Ok(r) => r,
            Err(_elapsed) => {
                bus.publish(
                    Event::for_item(EventKind::DialTimeout, item)
                        .with_attempt(attempt)
                        .with_timeout(dur),
                );
                return Err(DialError::Timeout { timeout: dur });
            }
        },
        None => call.await,
    };

    match res {
        Ok(r) => r,
        Err(payload) => Err(DialError::Panicked {
            info: panic_message(&*payload),
        }),
    }
}
