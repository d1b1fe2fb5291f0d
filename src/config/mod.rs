//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `NEWSROOM` prefix and
//! nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use newsroom::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod deployment;
mod error;
mod gateway;
mod hosted;
mod server;

pub use deployment::DeploymentConfig;
pub use error::{ConfigError, ValidationError};
pub use gateway::GatewayConfig;
pub use hosted::HostedConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults except `hosted`, which is absent when no hosted
/// project is configured. Load using [`AppConfig::load()`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Hosted backend configuration (URL, public key, readiness budget)
    #[serde(default)]
    pub hosted: Option<HostedConfig>,

    /// Deployment signals (hostname, path, overrides)
    #[serde(default)]
    pub deployment: DeploymentConfig,

    /// Local gateway configuration (client base URL, data directory)
    #[serde(default)]
    pub gateway: GatewayConfig,
}

impl AppConfig {
    /// Reads `.env` (when present) and then every `NEWSROOM__*` variable.
    ///
    /// Nesting uses a double underscore: `NEWSROOM__GATEWAY__DATA_DIR=/srv/data`
    /// sets `gateway.data_dir`. Setting any `NEWSROOM__HOSTED__*` variable
    /// enables the hosted section, which then needs both `URL` and `ANON_KEY`.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("NEWSROOM")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Checks every section; the hosted URL rules depend on the environment.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        if let Some(hosted) = &self.hosted {
            hosted.validate(&self.server.environment)?;
        }
        self.gateway.validate()
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
