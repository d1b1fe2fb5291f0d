//! In-memory record store.
//!
//! Keeps records in memory. Useful for testing and development.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::ResourceKind;
use crate::ports::{RecordStore, StoreError};

/// In-memory storage for gateway records
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordStore {
    records: Arc<RwLock<HashMap<ResourceKind, Vec<Value>>>>,
}

impl InMemoryRecordStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored data (useful for tests)
    pub async fn clear(&self) {
        self.records.write().await.clear();
    }

    /// Get the number of stored records of `kind`
    pub async fn count(&self, kind: ResourceKind) -> usize {
        self.records
            .read()
            .await
            .get(&kind)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn read_all(&self, kind: ResourceKind) -> Result<Vec<Value>, StoreError> {
        let records = self.records.read().await;
        Ok(records.get(&kind).cloned().unwrap_or_default())
    }

    async fn write_all(&self, kind: ResourceKind, records: &[Value]) -> Result<(), StoreError> {
        let mut stored = self.records.write().await;
        stored.insert(kind, records.to_vec());
        Ok(())
    }
}
