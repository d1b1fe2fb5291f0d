//! Errors surfaced by the data access layer.

use thiserror::Error;

use crate::domain::foundation::{AuthError, ErrorCode, RecordId};
use crate::domain::ResourceKind;
use crate::ports::{GatewayError, HostedError, StoreError};

/// Error returned by every facade and auth service operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The hosted client did not become ready within its budget.
    #[error("Hosted backend client is not available")]
    ClientUnavailable,

    /// A privileged operation was attempted without a valid session.
    #[error("Not authenticated. Please log in again.")]
    NotAuthenticated,

    /// Sign-in rejected the email/password pair.
    #[error("Invalid login credentials")]
    InvalidCredentials,

    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// The table has not been provisioned on the hosted backend.
    #[error("Relation missing: {0}")]
    RelationMissing(String),

    #[error("Backend failure: {0}")]
    BackendFailure(String),
}

impl AccessError {
    pub fn not_found(kind: ResourceKind, id: &RecordId) -> Self {
        AccessError::NotFound {
            resource: kind.label(),
            id: id.to_string(),
        }
    }

    /// Machine-readable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            AccessError::ClientUnavailable => ErrorCode::ClientUnavailable,
            AccessError::NotAuthenticated | AccessError::InvalidCredentials => {
                ErrorCode::Unauthorized
            }
            AccessError::NotFound { .. } => ErrorCode::NotFound,
            AccessError::ValidationFailed(_) => ErrorCode::ValidationFailed,
            AccessError::RelationMissing(_) => ErrorCode::RelationMissing,
            AccessError::BackendFailure(_) => ErrorCode::BackendFailure,
        }
    }

    /// Maps a hosted backend error for an operation on `kind`.
    ///
    /// `target` is the record an update or delete addressed; a "no rows"
    /// answer for it becomes `NotFound`.
    pub fn from_hosted(kind: ResourceKind, error: HostedError, target: Option<&RecordId>) -> Self {
        if error.is_relation_missing() {
            return AccessError::RelationMissing(error.message);
        }
        if let (true, Some(id)) = (error.is_no_rows(), target) {
            return AccessError::not_found(kind, id);
        }
        if error.is_validation() {
            return AccessError::ValidationFailed(error.message);
        }
        tracing::error!(
            resource = %kind,
            code = error.code.as_deref().unwrap_or("-"),
            "Hosted backend call failed: {}",
            error.message
        );
        AccessError::BackendFailure(error.message)
    }
}

impl From<AuthError> for AccessError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::InvalidCredentials => AccessError::InvalidCredentials,
            AuthError::InvalidToken => AccessError::NotAuthenticated,
            AuthError::ServiceUnavailable(message) => AccessError::BackendFailure(message),
        }
    }
}

impl From<GatewayError> for AccessError {
    fn from(error: GatewayError) -> Self {
        tracing::error!("Gateway call failed: {}", error);
        AccessError::BackendFailure(error.to_string())
    }
}

/// Errors building the data service from configuration.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Hosted backend setup failed: {0}")]
    Hosted(#[from] HostedError),

    #[error("Gateway client setup failed: {0}")]
    Gateway(#[from] GatewayError),
}

/// Errors from the gateway-side record service.
#[derive(Debug, Error)]
pub enum RecordServiceError {
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl RecordServiceError {
    pub fn code(&self) -> ErrorCode {
        match self {
            RecordServiceError::NotFound { .. } => ErrorCode::NotFound,
            RecordServiceError::ValidationFailed(_) => ErrorCode::ValidationFailed,
            RecordServiceError::Storage(_) => ErrorCode::InternalError,
        }
    }
}
