//! Deployment configuration (signals for backend selection)

use serde::Deserialize;

use crate::domain::{BackendSelector, DeploymentSignals};

/// Where the data layer is running.
#[derive(Debug, Clone, Deserialize)]
pub struct DeploymentConfig {
    /// Host name the site is served from
    #[serde(default = "default_hostname")]
    pub hostname: String,

    /// Path of the current page
    #[serde(default = "default_path")]
    pub path: String,

    /// Forces (or clears) the no-server signal instead of detecting it
    pub static_only: Option<bool>,

    /// Prefer an already-initialized hosted client for public reads
    #[serde(default = "default_prefer_initialized_handle")]
    pub prefer_initialized_handle: bool,
}

impl DeploymentConfig {
    /// Signals detected from host and path, with the override applied.
    pub fn signals(&self) -> DeploymentSignals {
        let mut signals = DeploymentSignals::detect(&self.hostname, &self.path);
        if let Some(static_only) = self.static_only {
            signals.static_only = static_only;
        }
        signals
    }

    /// Builds the selector for this deployment.
    pub fn selector(&self) -> BackendSelector {
        BackendSelector::new(self.signals())
            .with_prefer_initialized_handle(self.prefer_initialized_handle)
    }
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            hostname: default_hostname(),
            path: default_path(),
            static_only: None,
            prefer_initialized_handle: default_prefer_initialized_handle(),
        }
    }
}

fn default_hostname() -> String {
    "localhost".to_string()
}

fn default_path() -> String {
    "/".to_string()
}

fn default_prefer_initialized_handle() -> bool {
    true
}
