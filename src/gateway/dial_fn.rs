//! # Function-backed gateway (`DialFn`)
//!
//! [`DialFn`] wraps a closure `F: Fn(DialRequest) -> Fut`, producing a fresh
//! future per call. Handy for adapters over an HTTP client and for tests.
//!
//! ## Example
//! ```rust
//! use redialvisor::{DialError, DialFn, DialRequest, DialResponse, GatewayRef};
//!
//! let gw: GatewayRef = DialFn::arc("echo", |req: DialRequest| async move {
//!     Ok::<_, DialError>(DialResponse::connected(format!("call-{}", req.attempt)))
//! });
//! assert_eq!(gw.name(), "echo");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::DialError;
use crate::gateway::gateway::{DialGateway, DialRequest, DialResponse};

/// Closure-backed [`DialGateway`].
#[derive(Debug)]
pub struct DialFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> DialFn<F> {
    /// Creates a new function-backed gateway.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the gateway and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> DialGateway for DialFn<F>
where
    F: Fn(DialRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<DialResponse, DialError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn place_call(&self, req: DialRequest) -> Result<DialResponse, DialError> {
        (self.f)(req).await
    }
}
