//! Local gateway port (client side).
//!
//! The gateway exists only in server-backed deployments. The facade reaches it
//! for public reads; responses are arrays in the public (camelCase) shape.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::foundation::PublishStatus;
use crate::domain::ResourceKind;

/// Errors from talking to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Non-success HTTP status with the response body's message.
    #[error("Gateway returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Connection or request failure.
    #[error("Gateway unreachable: {0}")]
    Transport(String),

    /// Body could not be decoded.
    #[error("Gateway response malformed: {0}")]
    Decode(String),
}

/// Read access to the local gateway.
#[async_trait]
pub trait GatewayApi: Send + Sync {
    /// `GET /api/{resource}?status=`: the full filtered list, already ordered
    /// for public readers.
    async fn list(
        &self,
        kind: ResourceKind,
        status: Option<PublishStatus>,
    ) -> Result<Vec<Value>, GatewayError>;
}
