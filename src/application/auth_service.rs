//! Auth service: sign-in, sign-out and session lookup over the shared
//! hosted client handle.

use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::foundation::{Session, SessionUser};

use super::client_manager::ClientManager;
use super::error::AccessError;

/// Authentication operations for the admin surface.
#[derive(Clone)]
pub struct AuthService {
    clients: Arc<ClientManager>,
}

impl AuthService {
    pub fn new(clients: Arc<ClientManager>) -> Self {
        Self { clients }
    }

    /// Signs in with email and password. The session lands in the shared
    /// handle, so every facade sees it.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AccessError> {
        let client = self
            .clients
            .get_client()
            .await
            .ok_or(AccessError::ClientUnavailable)?;
        let session = client.sign_in_with_password(email, password).await.map_err(|e| {
            tracing::warn!("Sign-in failed: {}", e);
            AccessError::from(e)
        })?;
        tracing::info!(user_id = %session.user.id, "Signed in");
        self.clients.slot().publish_session(Some(session.clone()));
        Ok(session)
    }

    /// Ends the current session. Without a live handle there is nothing to
    /// end.
    pub async fn sign_out(&self) -> Result<(), AccessError> {
        let Some(client) = self.clients.current() else {
            return Ok(());
        };
        client.sign_out().await.map_err(|e| {
            tracing::error!("Sign-out failed: {}", e);
            AccessError::from(e)
        })?;
        tracing::info!("Signed out");
        self.clients.slot().publish_session(None);
        Ok(())
    }

    /// Auth-state changes: `Some(session)` after a sign-in, `None` after a
    /// sign-out. Shared by every service over the same client slot.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.clients.slot().subscribe()
    }

    /// The current session, or `None` when there is none or it cannot be
    /// fetched.
    pub async fn current_session(&self) -> Option<Session> {
        let client = self.clients.get_client().await?;
        match client.get_session().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Session lookup failed: {}", e);
                None
            }
        }
    }

    pub async fn current_user(&self) -> Option<SessionUser> {
        self.current_session().await.map(|session| session.user)
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current_session().await.is_some()
    }
}
