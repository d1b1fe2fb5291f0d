//! Record service behind the local gateway.
//!
//! Implements the gateway's list/create/update/delete semantics over a flat
//! `RecordStore`. Records are kept in the public shape. Every write is a
//! read-modify-write of the whole list and is serialized by one lock.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;

use crate::domain::foundation::{PublishStatus, RecordId, Timestamp, ValidationError};
use crate::domain::{Audience, Resource};
use crate::ports::{RecordStore, StoreError};

use super::error::RecordServiceError;

pub struct RecordService {
    store: Arc<dyn RecordStore>,
    write_lock: Mutex<()>,
}

impl RecordService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Records with `status` (all when `None`), in public order.
    pub async fn list<R: Resource>(
        &self,
        status: Option<PublishStatus>,
    ) -> Result<Vec<R>, RecordServiceError> {
        let mut records: Vec<R> = self
            .load::<R>()
            .await?
            .into_iter()
            .filter(|record| status.map_or(true, |s| record.status() == s))
            .collect();
        records.sort_by(|a, b| R::compare(a, b, Audience::Public));
        Ok(records)
    }

    /// Every record, in admin order.
    pub async fn list_all<R: Resource>(&self) -> Result<Vec<R>, RecordServiceError> {
        let mut records = self.load::<R>().await?;
        records.sort_by(|a, b| R::compare(a, b, Audience::Admin));
        Ok(records)
    }

    /// Validates `draft` and appends a new record with a generated id.
    pub async fn create<R: Resource>(&self, draft: R::Draft) -> Result<R, RecordServiceError> {
        R::validate_draft(&draft).map_err(validation_failed)?;

        let _guard = self.write_lock.lock().await;
        let mut records = self.load::<R>().await?;
        let record = R::create(RecordId::generate(), draft, Timestamp::now());
        records.push(record.clone());
        self.save(&records).await?;

        tracing::info!(resource = %R::KIND, id = %record.id(), "Record created");
        Ok(record)
    }

    /// Replaces the writable fields of record `id` with `draft`.
    pub async fn update<R: Resource>(
        &self,
        id: &RecordId,
        draft: R::Draft,
    ) -> Result<R, RecordServiceError> {
        R::validate_draft(&draft).map_err(validation_failed)?;

        let _guard = self.write_lock.lock().await;
        let mut records = self.load::<R>().await?;
        let record = records
            .iter_mut()
            .find(|record| record.id() == id)
            .ok_or_else(|| not_found::<R>(id))?;

        record.revise(draft, Timestamp::now());
        let updated = record.clone();
        self.save(&records).await?;

        tracing::info!(resource = %R::KIND, id = %id, "Record updated");
        Ok(updated)
    }

    pub async fn delete<R: Resource>(&self, id: &RecordId) -> Result<(), RecordServiceError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load::<R>().await?;
        let before = records.len();
        records.retain(|record| record.id() != id);
        if records.len() == before {
            return Err(not_found::<R>(id));
        }
        self.save(&records).await?;

        tracing::info!(resource = %R::KIND, id = %id, "Record deleted");
        Ok(())
    }

    async fn load<R: Resource>(&self) -> Result<Vec<R>, RecordServiceError> {
        self.store
            .read_all(R::KIND)
            .await?
            .into_iter()
            .map(|value| {
                serde_json::from_value::<R>(value).map_err(|e| {
                    tracing::error!(resource = %R::KIND, "Stored record is malformed: {}", e);
                    RecordServiceError::Storage(StoreError::Corrupt(e.to_string()))
                })
            })
            .collect()
    }

    async fn save<R: Resource>(&self, records: &[R]) -> Result<(), RecordServiceError> {
        let values = records
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<Value>, _>>()
            .map_err(|e| StoreError::SerializationFailed(e.to_string()))?;
        self.store.write_all(R::KIND, &values).await?;
        Ok(())
    }
}

fn validation_failed(error: ValidationError) -> RecordServiceError {
    RecordServiceError::ValidationFailed(error.to_string())
}

fn not_found<R: Resource>(id: &RecordId) -> RecordServiceError {
    RecordServiceError::NotFound {
        resource: R::KIND.label(),
        id: id.to_string(),
    }
}
