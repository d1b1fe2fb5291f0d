//! Data service wiring.
//!
//! Bundles the article and event facades and the auth service over one
//! `ClientManager`, so they share a single hosted client handle.

use std::sync::Arc;

use crate::adapters::gateway::HttpGatewayClient;
use crate::adapters::hosted::RestClientFactory;
use crate::config::AppConfig;
use crate::domain::{Article, BackendSelector, Event};
use crate::ports::GatewayApi;

use super::auth_service::AuthService;
use super::client_manager::{ClientManager, ClientSlot, ReadinessBudget};
use super::error::SetupError;
use super::facade::ResourceFacade;

/// Entry point for callers: `articles`, `events` and `auth`.
#[derive(Clone)]
pub struct DataService {
    pub articles: ResourceFacade<Article>,
    pub events: ResourceFacade<Event>,
    pub auth: AuthService,
    clients: Arc<ClientManager>,
}

impl DataService {
    pub fn new(
        clients: Arc<ClientManager>,
        selector: BackendSelector,
        gateway: Option<Arc<dyn GatewayApi>>,
    ) -> Self {
        Self {
            articles: ResourceFacade::new(clients.clone(), selector, gateway.clone()),
            events: ResourceFacade::new(clients.clone(), selector, gateway),
            auth: AuthService::new(clients.clone()),
            clients,
        }
    }

    /// Builds the service from configuration over the process-wide slot.
    pub fn from_config(config: &AppConfig) -> Result<Self, SetupError> {
        Self::from_config_with_slot(config, ClientSlot::global())
    }

    /// Builds the service from configuration over `slot`.
    ///
    /// Without a gateway base URL the deployment is treated as static-only.
    pub fn from_config_with_slot(
        config: &AppConfig,
        slot: Arc<ClientSlot>,
    ) -> Result<Self, SetupError> {
        let clients = match &config.hosted {
            Some(hosted) => Arc::new(ClientManager::new(
                slot,
                Arc::new(RestClientFactory::new(hosted.clone())?),
                ReadinessBudget::from_config(hosted),
            )),
            None => {
                tracing::warn!("No hosted backend configured; only a published handle can be used");
                Arc::new(ClientManager::unconfigured(slot))
            }
        };

        let gateway: Option<Arc<dyn GatewayApi>> = match &config.gateway.base_url {
            Some(base_url) => Some(Arc::new(HttpGatewayClient::new(
                base_url.clone(),
                config.gateway.request_timeout(),
            )?)),
            None => None,
        };

        let mut deployment = config.deployment.clone();
        if gateway.is_none() && !deployment.signals().static_only {
            tracing::info!("No gateway configured; treating deployment as static-only");
            deployment.static_only = Some(true);
        }
        let selector = deployment.selector();

        tracing::debug!(signals = ?selector.signals(), "Data service configured");
        Ok(Self::new(clients, selector, gateway))
    }

    pub fn clients(&self) -> &Arc<ClientManager> {
        &self.clients
    }
}
