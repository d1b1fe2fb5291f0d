//! JSON file record store.
//!
//! Keeps each resource kind as one pretty-printed JSON array on disk:
//! `{data_dir}/articles.json` and `{data_dir}/events.json`. A missing file is
//! created holding `[]` on first read.

use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use crate::domain::ResourceKind;
use crate::ports::{RecordStore, StoreError};

/// File-based record store for the local gateway
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `data_dir`
    ///
    /// # Example
    /// ```ignore
    /// let store = JsonFileStore::new("./data");
    /// ```
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    /// File holding the records of `kind`
    pub fn file_path(&self, kind: ResourceKind) -> PathBuf {
        self.data_dir.join(format!("{}.json", kind.table()))
    }

    async fn ensure_dir(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|e| StoreError::IoError(e.to_string()))
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn read_all(&self, kind: ResourceKind) -> Result<Vec<Value>, StoreError> {
        let file_path = self.file_path(kind);

        if !file_path.exists() {
            self.ensure_dir().await?;
            fs::write(&file_path, "[]")
                .await
                .map_err(|e| StoreError::IoError(e.to_string()))?;
            tracing::info!(path = %file_path.display(), "Created empty record file");
            return Ok(Vec::new());
        }

        let json = fs::read_to_string(&file_path)
            .await
            .map_err(|e| StoreError::IoError(e.to_string()))?;

        serde_json::from_str(&json).map_err(|e| {
            tracing::error!(path = %file_path.display(), "Record file is not a JSON array: {}", e);
            StoreError::Corrupt(e.to_string())
        })
    }

    async fn write_all(&self, kind: ResourceKind, records: &[Value]) -> Result<(), StoreError> {
        self.ensure_dir().await?;

        let json = serde_json::to_string_pretty(records)
            .map_err(|e| StoreError::SerializationFailed(e.to_string()))?;

        // Readers see either the old array or the new one, never a prefix.
        let file_path = self.file_path(kind);
        let temp_path = self
            .data_dir
            .join(format!(".{}.json.{}.tmp", kind.table(), Uuid::new_v4()));

        fs::write(&temp_path, json)
            .await
            .map_err(|e| StoreError::IoError(e.to_string()))?;

        if let Err(e) = fs::rename(&temp_path, &file_path).await {
            tracing::error!(path = %file_path.display(), "Failed to replace record file: {}", e);
            let _ = fs::remove_file(&temp_path).await;
            return Err(StoreError::IoError(e.to_string()));
        }

        Ok(())
    }
}
