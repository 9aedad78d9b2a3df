//! # Dial gateway abstraction.
//!
//! The voice provider is an external collaborator. The scheduler only needs
//! one call from it: place a single outbound call and report whether it
//! connected. Gateways must be safe to call repeatedly and must **not** retry
//! on their own; the retry policy lives entirely in the scheduler.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DialError;

/// One outbound call attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialRequest {
    pub agent_id: String,
    pub phone_number: String,
    pub contact_name: String,
    /// 1-based attempt number for this contact.
    pub attempt: u32,
}

/// Provider answer for one attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialResponse {
    pub success: bool,
    #[serde(default)]
    pub call_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl DialResponse {
    /// A connected call.
    pub fn connected(call_id: impl Into<String>) -> Self {
        Self {
            success: true,
            call_id: Some(call_id.into()),
            error: None,
        }
    }

    /// A call that did not connect.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            call_id: None,
            error: Some(error.into()),
        }
    }
}

/// # Places outbound calls.
///
/// Returning `Ok(DialResponse { success: false, .. })` and returning `Err(_)`
/// are equivalent for the scheduler: both count as a failed attempt.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use redialvisor::{DialError, DialGateway, DialRequest, DialResponse};
///
/// struct AlwaysBusy;
///
/// #[async_trait]
/// impl DialGateway for AlwaysBusy {
///     fn name(&self) -> &str { "always-busy" }
///
///     async fn place_call(&self, req: DialRequest) -> Result<DialResponse, DialError> {
///         Ok(DialResponse::failed(format!("{} busy", req.phone_number)))
///     }
/// }
/// ```
#[async_trait]
pub trait DialGateway: Send + Sync + 'static {
    /// Human-readable gateway name (for logs).
    fn name(&self) -> &str;

    /// Places one call. Should return promptly; the scheduler wraps it in a timeout.
    async fn place_call(&self, req: DialRequest) -> Result<DialResponse, DialError>;
}

/// Shared handle to a gateway.
pub type GatewayRef = Arc<dyn DialGateway>;
