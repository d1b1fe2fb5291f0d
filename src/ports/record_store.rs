//! Record store port for the local gateway's persistence.
//!
//! A flat store: each resource kind is one list of records in the public
//! shape, read and written whole.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::ResourceKind;

/// Errors that can occur during record store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Stored data is corrupt: {0}")]
    Corrupt(String),

    #[error("Failed to serialize records: {0}")]
    SerializationFailed(String),
}

/// Port for reading and replacing the stored records of one kind.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All records of `kind`, in stored order. An unprovisioned store reads as
    /// empty.
    async fn read_all(&self, kind: ResourceKind) -> Result<Vec<Value>, StoreError>;

    /// Replaces all records of `kind`.
    async fn write_all(&self, kind: ResourceKind, records: &[Value]) -> Result<(), StoreError>;
}
