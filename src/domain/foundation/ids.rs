//! Record identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Identifier of an article or event.
///
/// Kept as an opaque string: the hosted backend issues UUIDs while older
/// gateway data files carry short base-36 ids, and both must round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Creates a RecordId, rejecting blank values.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("id"));
        }
        Ok(Self(id))
    }

    /// Creates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_creates_unique_ids() {
        assert_ne!(RecordId::generate(), RecordId::generate());
    }

    #[test]
    fn new_rejects_blank_ids() {
        assert!(RecordId::new("").is_err());
        assert!(RecordId::new("   ").is_err());
    }

    #[test]
    fn accepts_non_uuid_ids() {
        let id: RecordId = "lq2k9x".parse().unwrap();
        assert_eq!(id.as_str(), "lq2k9x");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = RecordId::new("abc").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
    }
}
