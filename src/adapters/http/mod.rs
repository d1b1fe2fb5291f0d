//! HTTP adapters - REST API implementations.
//!
//! The local gateway exposes one set of record endpoints per resource.

pub mod records;

pub use records::{gateway_app, gateway_routes, ErrorResponse, GatewayState};
