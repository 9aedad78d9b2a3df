//! # Dial gateway boundary.
//!
//! - [`DialGateway`] trait implemented by provider adapters
//! - [`DialFn`] closure-backed implementation
//! - [`GatewayRef`] shared handle (`Arc<dyn DialGateway>`)
//! - [`DialRequest`], [`DialResponse`] wire types of one attempt

mod dial_fn;
#[allow(clippy::module_inception)]
mod gateway;

pub use dial_fn::DialFn;
pub use gateway::{DialGateway, DialRequest, DialResponse, GatewayRef};
