//! Local gateway adapters.
//!
//! - `http_client` - `GatewayApi` over HTTP (`HttpGatewayClient`)

mod http_client;

pub use http_client::HttpGatewayClient;
