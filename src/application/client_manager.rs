//! Client singleton manager.
//!
//! Every module that needs the hosted backend goes through a `ClientManager`.
//! Managers built over the same `ClientSlot` share one handle, and with it one
//! authentication session: signing in through any of them is visible to all.
//!
//! The handle is built lazily on first use, after the client library reports
//! ready. Readiness is polled on a bounded `ReadinessBudget`; when the budget
//! runs out the manager yields `None` so that callers can fall back.
//!
//! The slot also carries the auth-state channel: sign-in and sign-out publish
//! the new session there for every subscriber.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use once_cell::sync::Lazy;
use tokio::sync::{watch, Mutex};

use crate::config::HostedConfig;
use crate::domain::foundation::Session;
use crate::ports::{HostedBackend, HostedClientFactory};

static GLOBAL_SLOT: Lazy<Arc<ClientSlot>> = Lazy::new(|| Arc::new(ClientSlot::new()));

/// Shared registry holding at most one hosted client handle.
pub struct ClientSlot {
    handle: RwLock<Option<Arc<dyn HostedBackend>>>,
    construction: Mutex<()>,
    session_events: watch::Sender<Option<Session>>,
}

impl ClientSlot {
    pub fn new() -> Self {
        Self {
            handle: RwLock::new(None),
            construction: Mutex::new(()),
            session_events: watch::channel(None).0,
        }
    }

    /// The process-wide slot.
    pub fn global() -> Arc<ClientSlot> {
        GLOBAL_SLOT.clone()
    }

    /// The published handle, if any.
    pub fn get(&self) -> Option<Arc<dyn HostedBackend>> {
        self.handle
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.get().is_some()
    }

    /// Publishes `handle` unless one is already present; returns the handle
    /// that ends up in the slot.
    pub fn publish(&self, handle: Arc<dyn HostedBackend>) -> Arc<dyn HostedBackend> {
        let mut slot = self.handle.write().unwrap_or_else(PoisonError::into_inner);
        slot.get_or_insert(handle).clone()
    }

    /// Releases the handle. Only for process shutdown and tests; managers
    /// holding this slot will build a fresh handle on next use.
    pub fn teardown(&self) -> Option<Arc<dyn HostedBackend>> {
        let released = self
            .handle
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if released.is_some() {
            self.publish_session(None);
        }
        released
    }

    /// Receiver of auth-state changes. It starts at the last published
    /// session.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.session_events.subscribe()
    }

    /// Announces a new session (or its end) to every subscriber.
    pub fn publish_session(&self, session: Option<Session>) {
        self.session_events.send_replace(session);
    }
}

impl Default for ClientSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// How long to wait for the client library: `max_attempts` polls spaced by
/// `interval`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessBudget {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl ReadinessBudget {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    pub fn from_config(config: &HostedConfig) -> Self {
        Self::new(config.ready_poll_interval(), config.ready_max_attempts)
    }

    /// Upper bound on the time spent waiting.
    pub fn total(&self) -> Duration {
        self.interval * self.max_attempts
    }
}

impl Default for ReadinessBudget {
    fn default() -> Self {
        Self::new(Duration::from_millis(100), 50)
    }
}

/// Hands out the shared hosted client handle.
pub struct ClientManager {
    slot: Arc<ClientSlot>,
    factory: Option<Arc<dyn HostedClientFactory>>,
    budget: ReadinessBudget,
}

impl ClientManager {
    pub fn new(
        slot: Arc<ClientSlot>,
        factory: Arc<dyn HostedClientFactory>,
        budget: ReadinessBudget,
    ) -> Self {
        Self {
            slot,
            factory: Some(factory),
            budget,
        }
    }

    /// Manager with no way to build a handle; it can only adopt one that
    /// another module published to `slot`.
    pub fn unconfigured(slot: Arc<ClientSlot>) -> Self {
        Self {
            slot,
            factory: None,
            budget: ReadinessBudget::default(),
        }
    }

    pub fn slot(&self) -> &Arc<ClientSlot> {
        &self.slot
    }

    pub fn budget(&self) -> ReadinessBudget {
        self.budget
    }

    /// The handle if one is already published; never constructs.
    pub fn current(&self) -> Option<Arc<dyn HostedBackend>> {
        self.slot.get()
    }

    /// The shared handle, constructing it on first use.
    ///
    /// Returns `None` when the client library does not become ready within
    /// the budget or construction fails.
    pub async fn get_client(&self) -> Option<Arc<dyn HostedBackend>> {
        if let Some(handle) = self.slot.get() {
            return Some(handle);
        }

        let Some(factory) = self.factory.as_ref() else {
            tracing::warn!("Hosted backend is not configured");
            return None;
        };

        let _guard = self.slot.construction.lock().await;
        // Another caller may have finished construction while we waited.
        if let Some(handle) = self.slot.get() {
            return Some(handle);
        }

        if !self.wait_until_ready(factory.as_ref()).await {
            tracing::warn!(
                waited_ms = self.budget.total().as_millis() as u64,
                "Hosted client library not ready in time"
            );
            return None;
        }

        match factory.create() {
            Ok(handle) => {
                tracing::info!("Hosted backend client initialized");
                Some(self.slot.publish(handle))
            }
            Err(e) => {
                tracing::warn!("Failed to construct hosted backend client: {}", e);
                None
            }
        }
    }

    async fn wait_until_ready(&self, factory: &dyn HostedClientFactory) -> bool {
        for attempt in 1..=self.budget.max_attempts {
            if factory.is_ready().await {
                tracing::debug!(attempt, "Hosted client library ready");
                return true;
            }
            if attempt < self.budget.max_attempts {
                tokio::time::sleep(self.budget.interval).await;
            }
        }
        false
    }
}
