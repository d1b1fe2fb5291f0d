//! HTTP routes for the local gateway.

use std::time::Duration;

use axum::{
    http::HeaderValue,
    routing::{get, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::domain::{Article, Event};

use super::dto::GatewayResource;
use super::handlers::{
    create_record, delete_record, list_all_records, list_records, update_record, GatewayState,
};

/// Adds the collection, item and admin routes of one resource.
fn resource_routes<R: GatewayResource>(router: Router<GatewayState>) -> Router<GatewayState> {
    let collection = format!("/api/{}", R::KIND.table());
    router
        .route(&collection, get(list_records::<R>).post(create_record::<R>))
        .route(
            &format!("{}/:id", collection),
            put(update_record::<R>).delete(delete_record::<R>),
        )
        .route(
            &format!("/api/admin/{}", R::KIND.table()),
            get(list_all_records::<R>),
        )
}

/// Creates the gateway router for articles and events.
pub fn gateway_routes(state: GatewayState) -> Router {
    let router = resource_routes::<Article>(Router::new());
    resource_routes::<Event>(router).with_state(state)
}

/// Gateway router with tracing, timeout and CORS layers.
pub fn gateway_app(state: GatewayState, server: &ServerConfig) -> Router {
    gateway_routes(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(cors_layer(server))
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .into_iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let layer = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}
