//! HTTP handlers for the gateway's record endpoints.
//!
//! Handlers are generic over the resource; `routes` instantiates them once
//! per resource kind.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::application::{RecordService, RecordServiceError};
use crate::domain::foundation::{PublishStatus, RecordId, ValidationError};

use super::dto::{ErrorResponse, GatewayResource, ListQuery};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct GatewayState {
    records: Arc<RecordService>,
}

impl GatewayState {
    pub fn new(records: Arc<RecordService>) -> Self {
        Self { records }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/{resource}?status= - Public listing
pub async fn list_records<R: GatewayResource>(
    State(state): State<GatewayState>,
    Query(query): Query<ListQuery>,
) -> Response {
    let status = match query.status.as_deref() {
        None | Some("") => None,
        Some(raw) => match raw.parse::<PublishStatus>() {
            Ok(status) => Some(status),
            // No record carries an unknown status.
            Err(_) => return (StatusCode::OK, Json(Vec::<R>::new())).into_response(),
        },
    };

    match state.records.list::<R>(status).await {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(e) => handle_record_error(e),
    }
}

/// GET /api/admin/{resource} - Every record, admin order
pub async fn list_all_records<R: GatewayResource>(State(state): State<GatewayState>) -> Response {
    match state.records.list_all::<R>().await {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(e) => handle_record_error(e),
    }
}

/// POST /api/{resource} - Create a record
pub async fn create_record<R: GatewayResource>(
    State(state): State<GatewayState>,
    Json(body): Json<Value>,
) -> Response {
    let draft = match R::draft_from_json(body) {
        Ok(draft) => draft,
        Err(e) => return validation_error(e),
    };

    match state.records.create::<R>(draft).await {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => handle_record_error(e),
    }
}

/// PUT /api/{resource}/:id - Update a record
///
/// The body must be a complete record, as on create. Only the id and
/// `createdAt` are kept from the stored record.
pub async fn update_record<R: GatewayResource>(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let id = match id.parse::<RecordId>() {
        Ok(id) => id,
        Err(e) => return validation_error(e),
    };
    let draft = match R::draft_from_json(body) {
        Ok(draft) => draft,
        Err(e) => return validation_error(e),
    };

    match state.records.update::<R>(&id, draft).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => handle_record_error(e),
    }
}

/// DELETE /api/{resource}/:id - Delete a record
pub async fn delete_record<R: GatewayResource>(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Response {
    let id = match id.parse::<RecordId>() {
        Ok(id) => id,
        Err(e) => return validation_error(e),
    };

    match state.records.delete::<R>(&id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => handle_record_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn validation_error(error: ValidationError) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::bad_request(error.to_string())),
    )
        .into_response()
}

fn handle_record_error(error: RecordServiceError) -> Response {
    match error {
        RecordServiceError::NotFound { resource, id } => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found(resource, &id)),
        )
            .into_response(),
        RecordServiceError::ValidationFailed(message) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(message)),
        )
            .into_response(),
        RecordServiceError::Storage(e) => {
            tracing::error!("Record store failure: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal(format!("Failed to access records: {}", e))),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::StoreError;

    #[test]
    fn not_found_maps_to_404() {
        let response = handle_record_error(RecordServiceError::NotFound {
            resource: "Article",
            id: "abc".to_string(),
        });
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_failed_maps_to_400() {
        let response =
            handle_record_error(RecordServiceError::ValidationFailed("title".to_string()));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn storage_failure_maps_to_500() {
        let response = handle_record_error(RecordServiceError::Storage(StoreError::IoError(
            "disk full".to_string(),
        )));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
