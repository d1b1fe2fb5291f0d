//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the data access layer and the outside world. Adapters implement these ports.
//!
//! - `HostedBackend` - Authenticated client handle for the hosted data service
//! - `HostedClientFactory` - Readiness check and construction of that handle
//! - `GatewayApi` - Public reads through the local HTTP gateway
//! - `RecordStore` - Flat persistence behind the local gateway

mod gateway_api;
mod hosted_backend;
mod hosted_client_factory;
mod record_store;

pub use gateway_api::{GatewayApi, GatewayError};
pub use hosted_backend::{
    HostedBackend, HostedError, QueryResult, TableQuery, CODE_NO_ROWS, CODE_RELATION_MISSING,
};
pub use hosted_client_factory::HostedClientFactory;
pub use record_store::{RecordStore, StoreError};
