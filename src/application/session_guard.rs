//! Session guard for privileged operations.

use crate::domain::foundation::{Session, Timestamp};
use crate::ports::HostedBackend;

use super::error::AccessError;

/// Confirms an active session before a privileged call is issued.
pub struct SessionGuard;

impl SessionGuard {
    /// Returns the active session held by `client`.
    ///
    /// No session, an expired one, or a failure to fetch it all yield
    /// `NotAuthenticated`.
    pub async fn require_session(client: &dyn HostedBackend) -> Result<Session, AccessError> {
        match client.get_session().await {
            Ok(Some(session)) if !session.is_expired_at(Timestamp::now()) => Ok(session),
            Ok(_) => {
                tracing::debug!("Privileged operation without a session");
                Err(AccessError::NotAuthenticated)
            }
            Err(e) => {
                tracing::warn!("Session lookup failed: {}", e);
                Err(AccessError::NotAuthenticated)
            }
        }
    }
}
