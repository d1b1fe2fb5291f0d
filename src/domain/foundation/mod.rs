//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! shared by articles and events.

mod auth;
mod errors;
mod ids;
mod publish_status;
mod timestamp;

pub use auth::{AuthError, Session, SessionUser};
pub use errors::{ErrorCode, ValidationError};
pub use ids::RecordId;
pub use publish_status::PublishStatus;
pub use timestamp::Timestamp;
