//! Resource facade.
//!
//! One `ResourceFacade<R>` per resource type gives callers a single contract
//! regardless of where the data lives. Each call asks the selector once where
//! to go and then talks to exactly one backend:
//!
//! - public reads go to the local gateway, or straight to the hosted backend
//!   in static-only deployments and when a hosted handle is already live;
//! - admin reads and writes always go to the hosted backend, behind the
//!   session guard.
//!
//! Rows are mapped between the persisted and public shapes here. A table that
//! has not been provisioned reads as empty for public listings.

use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;

use crate::domain::foundation::{PublishStatus, RecordId, Timestamp};
use crate::domain::{
    Audience, BackendChoice, BackendSelector, Page, PageWindow, Privilege, Resource, WriteStamp,
};
use crate::ports::{GatewayApi, HostedBackend, TableQuery};

use super::client_manager::ClientManager;
use super::error::AccessError;
use super::session_guard::SessionGuard;

/// Uniform CRUD and paginated listing for one resource type.
pub struct ResourceFacade<R> {
    clients: Arc<ClientManager>,
    selector: BackendSelector,
    gateway: Option<Arc<dyn GatewayApi>>,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceFacade<R> {
    fn clone(&self) -> Self {
        Self {
            clients: self.clients.clone(),
            selector: self.selector,
            gateway: self.gateway.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> ResourceFacade<R> {
    pub fn new(
        clients: Arc<ClientManager>,
        selector: BackendSelector,
        gateway: Option<Arc<dyn GatewayApi>>,
    ) -> Self {
        Self {
            clients,
            selector,
            gateway,
            _resource: PhantomData,
        }
    }

    /// Public listing, optionally filtered by status.
    ///
    /// Articles come newest first, events soonest first.
    pub async fn list(&self, status: Option<PublishStatus>) -> Result<Vec<R>, AccessError> {
        match self.choose(Privilege::PublicRead) {
            BackendChoice::HostedDirect => {
                let client = self.client().await?;
                let query = self.public_query(status);
                match client.select(&query).await {
                    Ok(result) => decode_rows(result.rows),
                    Err(e) if e.is_relation_missing() => {
                        tracing::warn!(resource = %R::KIND, "Table not provisioned; listing as empty");
                        Ok(Vec::new())
                    }
                    Err(e) => Err(AccessError::from_hosted(R::KIND, e, None)),
                }
            }
            BackendChoice::Gateway => self.gateway_list(status).await,
        }
    }

    /// Admin listing: every record regardless of status.
    ///
    /// Requires a session. Events come latest first.
    pub async fn list_all(&self) -> Result<Vec<R>, AccessError> {
        let client = self.privileged_client().await?;
        let query = TableQuery::from(R::KIND.table()).order(R::KIND.order(Audience::Admin));
        let result = client
            .select(&query)
            .await
            .map_err(|e| AccessError::from_hosted(R::KIND, e, None))?;
        decode_rows(result.rows)
    }

    /// Creates a record; `createdAt` and `updatedAt` share one instant.
    pub async fn create(&self, draft: R::Draft) -> Result<R, AccessError> {
        let client = self.privileged_client().await?;
        let row = encode_write::<R>(&draft, WriteStamp::Created(Timestamp::now()))?;
        let stored = client
            .insert(R::KIND.table(), row)
            .await
            .map_err(|e| AccessError::from_hosted(R::KIND, e, None))?;
        tracing::info!(resource = %R::KIND, "Record created");
        decode_row(stored)
    }

    /// Replaces the writable fields of record `id`.
    pub async fn update(&self, id: &RecordId, draft: R::Draft) -> Result<R, AccessError> {
        let client = self.privileged_client().await?;
        let row = encode_write::<R>(&draft, WriteStamp::Updated(Timestamp::now()))?;
        let stored = client
            .update(R::KIND.table(), id, row)
            .await
            .map_err(|e| AccessError::from_hosted(R::KIND, e, Some(id)))?;
        tracing::info!(resource = %R::KIND, id = %id, "Record updated");
        decode_row(stored)
    }

    pub async fn delete(&self, id: &RecordId) -> Result<(), AccessError> {
        let client = self.privileged_client().await?;
        let removed = client
            .delete(R::KIND.table(), id)
            .await
            .map_err(|e| AccessError::from_hosted(R::KIND, e, Some(id)))?;
        if removed == 0 {
            return Err(AccessError::not_found(R::KIND, id));
        }
        tracing::info!(resource = %R::KIND, id = %id, "Record deleted");
        Ok(())
    }

    /// One page of the public listing plus the size of the filtered set; the
    /// paginated form of [`list`](Self::list).
    ///
    /// `page` and `page_size` are clamped, never rejected.
    pub async fn get_page(
        &self,
        status: Option<PublishStatus>,
        page: i64,
        page_size: i64,
    ) -> Result<Page<R>, AccessError> {
        let window = PageWindow::compute(page, page_size);
        match self.choose(Privilege::PublicRead) {
            BackendChoice::HostedDirect => {
                let client = self.client().await?;
                let (from, to) = window.range();
                let query = self.public_query(status).range(from, to).with_count();
                match client.select(&query).await {
                    Ok(result) => {
                        let total = result.count.unwrap_or_else(|| {
                            tracing::warn!(resource = %R::KIND, "Ranged query returned no count");
                            0
                        });
                        Ok(Page {
                            items: decode_rows(result.rows)?,
                            total,
                        })
                    }
                    Err(e) if e.is_relation_missing() => {
                        tracing::warn!(resource = %R::KIND, "Table not provisioned; empty page");
                        Ok(Page::empty())
                    }
                    Err(e) => Err(AccessError::from_hosted(R::KIND, e, None)),
                }
            }
            BackendChoice::Gateway => Ok(window.slice(self.gateway_list(status).await?)),
        }
    }

    fn choose(&self, privilege: Privilege) -> BackendChoice {
        let handle_ready = self.clients.current().is_some();
        let choice = self.selector.select(privilege, handle_ready);
        tracing::debug!(resource = %R::KIND, ?privilege, ?choice, "Backend selected");
        choice
    }

    fn public_query(&self, status: Option<PublishStatus>) -> TableQuery {
        let query = TableQuery::from(R::KIND.table()).order(R::KIND.order(Audience::Public));
        match status {
            Some(status) => query.eq("status", status.as_str()),
            None => query,
        }
    }

    async fn client(&self) -> Result<Arc<dyn HostedBackend>, AccessError> {
        self.clients
            .get_client()
            .await
            .ok_or(AccessError::ClientUnavailable)
    }

    /// Client handle with an active session.
    async fn privileged_client(&self) -> Result<Arc<dyn HostedBackend>, AccessError> {
        let client = self.client().await?;
        SessionGuard::require_session(client.as_ref()).await?;
        Ok(client)
    }

    async fn gateway_list(&self, status: Option<PublishStatus>) -> Result<Vec<R>, AccessError> {
        let gateway = self.gateway.as_ref().ok_or_else(|| {
            AccessError::BackendFailure("Local gateway is not configured".to_string())
        })?;
        let records = gateway.list(R::KIND, status).await?;
        records
            .into_iter()
            .map(|value| {
                serde_json::from_value::<R>(value).map_err(|e| {
                    tracing::error!(resource = %R::KIND, "Malformed gateway record: {}", e);
                    AccessError::BackendFailure(format!("Malformed gateway record: {}", e))
                })
            })
            .collect()
    }
}

fn encode_write<R: Resource>(draft: &R::Draft, stamp: WriteStamp) -> Result<Value, AccessError> {
    serde_json::to_value(R::write_row(draft, stamp))
        .map_err(|e| AccessError::ValidationFailed(format!("Unserializable payload: {}", e)))
}

fn decode_row<R: Resource>(row: Value) -> Result<R, AccessError> {
    serde_json::from_value::<R::Row>(row)
        .map(R::from_row)
        .map_err(|e| {
            tracing::error!(resource = %R::KIND, "Malformed hosted row: {}", e);
            AccessError::BackendFailure(format!("Malformed {} row: {}", R::KIND, e))
        })
}

fn decode_rows<R: Resource>(rows: Vec<Value>) -> Result<Vec<R>, AccessError> {
    rows.into_iter().map(decode_row::<R>).collect()
}
