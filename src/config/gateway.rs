//! Local gateway configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::error::ValidationError;

/// Local gateway configuration.
///
/// `base_url` is where clients reach the gateway; `data_dir` is where the
/// gateway process keeps its JSON files.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Gateway base URL for clients (e.g. `http://localhost:3000`); unset in
    /// static-only deployments
    pub base_url: Option<String>,

    /// Directory holding `articles.json` and `events.json`
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Client request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl GatewayConfig {
    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate gateway configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(url) = &self.base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ValidationError::InvalidUrl("GATEWAY__BASE_URL"));
            }
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            data_dir: default_data_dir(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_request_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.base_url, None);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let config = GatewayConfig {
            base_url: Some("localhost:3000".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidUrl("GATEWAY__BASE_URL"))
        );
    }
}
