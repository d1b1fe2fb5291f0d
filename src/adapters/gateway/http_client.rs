//! HTTP client for the local gateway.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::foundation::PublishStatus;
use crate::domain::ResourceKind;
use crate::ports::{GatewayApi, GatewayError};

/// Error body the gateway sends with non-success statuses.
#[derive(Debug, Default, Deserialize)]
struct GatewayErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// `GatewayApi` over HTTP.
pub struct HttpGatewayClient {
    base_url: String,
    http_client: Client,
}

impl HttpGatewayClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Transport(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
        })
    }

    fn list_url(&self, kind: ResourceKind) -> String {
        format!("{}/api/{}", self.base_url, kind.table())
    }
}

#[async_trait]
impl GatewayApi for HttpGatewayClient {
    async fn list(
        &self,
        kind: ResourceKind,
        status: Option<PublishStatus>,
    ) -> Result<Vec<Value>, GatewayError> {
        let mut request = self.http_client.get(self.list_url(kind));
        if let Some(status) = status {
            request = request.query(&[("status", status.as_str())]);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!("Gateway request failed: {}", e);
            GatewayError::Transport(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.json::<GatewayErrorBody>().await.unwrap_or_default();
            let message = body.error.unwrap_or_else(|| status.to_string());
            tracing::warn!(status = status.as_u16(), "Gateway returned an error: {}", message);
            return Err(GatewayError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response.json::<Vec<Value>>().await.map_err(|e| {
            tracing::error!("Failed to decode gateway response: {}", e);
            GatewayError::Decode(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_url_uses_table_segment() {
        let client =
            HttpGatewayClient::new("http://localhost:3000/", Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.list_url(ResourceKind::Events),
            "http://localhost:3000/api/events"
        );
    }

    #[tokio::test]
    async fn unreachable_gateway_is_a_transport_error() {
        let client =
            HttpGatewayClient::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();

        let result = client.list(ResourceKind::Articles, None).await;

        assert!(matches!(result, Err(GatewayError::Transport(_))));
    }
}
