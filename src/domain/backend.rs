//! Backend selection.
//!
//! Every facade call asks the `BackendSelector` once which backend to use and
//! switches on the returned `BackendChoice`. Deployment signals are computed
//! once at construction; the only per-call inputs are the operation's
//! privilege and whether a hosted client handle is already initialized.

use serde::Deserialize;

/// Where a call is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendChoice {
    /// Straight to the hosted backend with the shared authenticated client.
    HostedDirect,
    /// Through the local HTTP gateway.
    Gateway,
}

/// Privilege level of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    /// Listing published content for readers.
    PublicRead,
    /// Unfiltered listing for the admin surface.
    AdminRead,
    /// Create, update or delete.
    Write,
}

/// Static facts about the deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct DeploymentSignals {
    /// No controllable server: the gateway does not exist.
    pub static_only: bool,
    /// Running on the admin surface.
    pub admin_surface: bool,
}

impl DeploymentSignals {
    /// Derives signals from the page location.
    ///
    /// GitHub Pages hosts (and the `/docs/` publishing folder) are static-only.
    /// Any path mentioning `admin` is the admin surface.
    pub fn detect(hostname: &str, path: &str) -> Self {
        let hostname = hostname.to_ascii_lowercase();
        let static_only = hostname.contains("github.io")
            || hostname.contains("github.com")
            || path.contains("/docs/");
        Self {
            static_only,
            admin_surface: path.contains("admin"),
        }
    }
}

/// Pure decision function over deployment signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendSelector {
    signals: DeploymentSignals,
    prefer_initialized_handle: bool,
}

impl BackendSelector {
    pub fn new(signals: DeploymentSignals) -> Self {
        Self {
            signals,
            prefer_initialized_handle: true,
        }
    }

    /// When false, public reads go to the gateway even if a hosted handle
    /// already exists.
    pub fn with_prefer_initialized_handle(mut self, prefer: bool) -> Self {
        self.prefer_initialized_handle = prefer;
        self
    }

    pub fn signals(&self) -> DeploymentSignals {
        self.signals
    }

    /// Privilege after accounting for the admin surface: a read issued from
    /// the admin surface is an admin read.
    pub fn effective_privilege(&self, privilege: Privilege) -> Privilege {
        match privilege {
            Privilege::PublicRead if self.signals.admin_surface => Privilege::AdminRead,
            other => other,
        }
    }

    /// Picks the backend for one call.
    pub fn select(&self, privilege: Privilege, handle_ready: bool) -> BackendChoice {
        if self.signals.static_only {
            return BackendChoice::HostedDirect;
        }
        match self.effective_privilege(privilege) {
            Privilege::Write | Privilege::AdminRead => BackendChoice::HostedDirect,
            Privilege::PublicRead if handle_ready && self.prefer_initialized_handle => {
                BackendChoice::HostedDirect
            }
            Privilege::PublicRead => BackendChoice::Gateway,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server_backed() -> BackendSelector {
        BackendSelector::new(DeploymentSignals::detect("localhost", "/index.html"))
    }

    #[test]
    fn detects_github_pages_hosts() {
        assert!(DeploymentSignals::detect("org.github.io", "/").static_only);
        assert!(DeploymentSignals::detect("GitHub.com", "/").static_only);
        assert!(DeploymentSignals::detect("localhost", "/site/docs/index.html").static_only);
        assert!(!DeploymentSignals::detect("localhost", "/index.html").static_only);
    }

    #[test]
    fn detects_admin_surface() {
        assert!(DeploymentSignals::detect("localhost", "/admin.html").admin_surface);
        assert!(!DeploymentSignals::detect("localhost", "/events.html").admin_surface);
    }

    #[test]
    fn static_deployment_always_uses_hosted() {
        let selector = BackendSelector::new(DeploymentSignals::detect("org.github.io", "/"));
        for privilege in [Privilege::PublicRead, Privilege::AdminRead, Privilege::Write] {
            assert_eq!(selector.select(privilege, false), BackendChoice::HostedDirect);
        }
    }

    #[test]
    fn privileged_operations_use_hosted_on_server_deployments() {
        let selector = server_backed();
        assert_eq!(selector.select(Privilege::Write, false), BackendChoice::HostedDirect);
        assert_eq!(selector.select(Privilege::AdminRead, false), BackendChoice::HostedDirect);
    }

    #[test]
    fn public_reads_use_gateway_until_a_handle_exists() {
        let selector = server_backed();
        assert_eq!(selector.select(Privilege::PublicRead, false), BackendChoice::Gateway);
        assert_eq!(selector.select(Privilege::PublicRead, true), BackendChoice::HostedDirect);
    }

    #[test]
    fn initialized_handle_preference_can_be_disabled() {
        let selector = server_backed().with_prefer_initialized_handle(false);
        assert_eq!(selector.select(Privilege::PublicRead, true), BackendChoice::Gateway);
    }

    #[test]
    fn reads_on_admin_surface_are_admin_reads() {
        let selector = BackendSelector::new(DeploymentSignals::detect("localhost", "/admin.html"));
        assert_eq!(selector.effective_privilege(Privilege::PublicRead), Privilege::AdminRead);
        assert_eq!(selector.select(Privilege::PublicRead, false), BackendChoice::HostedDirect);
    }
}
