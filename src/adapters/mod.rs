//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the data access layer to external systems:
//! - `hosted` - Hosted backend clients (REST, in-memory)
//! - `gateway` - Client for the local HTTP gateway
//! - `http` - The local gateway's own HTTP endpoints
//! - `storage` - Record stores behind the gateway (JSON files, in-memory)

pub mod gateway;
pub mod hosted;
pub mod http;
pub mod storage;

pub use gateway::HttpGatewayClient;
pub use hosted::{RestClientFactory, RestHostedBackend};
pub use storage::{InMemoryRecordStore, JsonFileStore};
