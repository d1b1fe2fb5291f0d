//! Local gateway server: serves articles and events from JSON files.

use std::sync::Arc;

use newsroom::adapters::http::{gateway_app, GatewayState};
use newsroom::adapters::storage::JsonFileStore;
use newsroom::application::RecordService;
use newsroom::config::AppConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    let store = Arc::new(JsonFileStore::new(&config.gateway.data_dir));
    let records = Arc::new(RecordService::new(store));
    let app = gateway_app(GatewayState::new(records), &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        environment = ?config.server.environment,
        data_dir = %config.gateway.data_dir.display(),
        "Gateway listening on {}",
        listener.local_addr()?
    );

    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
