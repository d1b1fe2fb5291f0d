//! Hosted backend configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// Hosted backend configuration (endpoint, public key, client readiness wait)
#[derive(Debug, Clone, Deserialize)]
pub struct HostedConfig {
    /// Project URL, e.g. `https://abc.supabase.co`
    pub url: String,

    /// Public (anon) key; safe to ship to browsers but kept out of logs
    pub anon_key: Secret<String>,

    /// Interval between client readiness polls in milliseconds
    #[serde(default = "default_ready_poll_interval")]
    pub ready_poll_interval_ms: u64,

    /// Maximum number of readiness polls before giving up
    #[serde(default = "default_ready_max_attempts")]
    pub ready_max_attempts: u32,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl HostedConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            anon_key: Secret::new(anon_key.into()),
            ready_poll_interval_ms: default_ready_poll_interval(),
            ready_max_attempts: default_ready_max_attempts(),
            request_timeout_secs: default_request_timeout(),
        }
    }

    /// Exposes the public key (for request headers).
    pub fn anon_key(&self) -> &str {
        self.anon_key.expose_secret()
    }

    /// Get readiness poll interval as Duration
    pub fn ready_poll_interval(&self) -> Duration {
        Duration::from_millis(self.ready_poll_interval_ms)
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate hosted backend configuration
    ///
    /// In production, requires HTTPS for the project URL.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingRequired("HOSTED__URL"));
        }
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(ValidationError::InvalidUrl("HOSTED__URL"));
        }
        if *environment == Environment::Production && !self.url.starts_with("https://") {
            return Err(ValidationError::HostedUrlMustBeHttps);
        }
        if self.anon_key().is_empty() {
            return Err(ValidationError::MissingRequired("HOSTED__ANON_KEY"));
        }
        if self.ready_poll_interval_ms == 0 || self.ready_max_attempts == 0 {
            return Err(ValidationError::InvalidReadinessBudget);
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

fn default_ready_poll_interval() -> u64 {
    100
}

fn default_ready_max_attempts() -> u32 {
    50
}

fn default_request_timeout() -> u64 {
    10
}
