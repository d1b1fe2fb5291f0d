//! Factory port for hosted backend client handles.
//!
//! Separates "is the client library usable yet" from "build a handle", so the
//! `ClientManager` can wait on readiness with a bounded budget before it
//! constructs the single shared handle.

use std::sync::Arc;

use async_trait::async_trait;

use super::{HostedBackend, HostedError};

/// Builds hosted backend client handles.
///
/// # Contract
///
/// - `is_ready` is cheap to poll and never blocks past the adapter's own
///   request timeout.
/// - `create` is called at most once per `ClientSlot`; implementations must
///   not cache or share handles themselves.
#[async_trait]
pub trait HostedClientFactory: Send + Sync {
    /// True once a handle can be constructed.
    async fn is_ready(&self) -> bool;

    /// Constructs a new client handle.
    fn create(&self) -> Result<Arc<dyn HostedBackend>, HostedError>;
}
