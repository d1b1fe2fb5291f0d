//! HTTP adapter for the local gateway's record endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{ArticleRequest, ErrorResponse, EventRequest, GatewayResource, ListQuery};
pub use handlers::GatewayState;
pub use routes::{gateway_app, gateway_routes};
