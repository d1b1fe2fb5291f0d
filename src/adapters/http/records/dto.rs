//! HTTP DTOs for the gateway's record endpoints.
//!
//! Request bodies are parsed loosely (every field optional, strings for
//! enums and dates) and then turned into drafts, so that a bad field yields a
//! 400 with a message instead of a body rejection.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::{ErrorCode, PublishStatus, Timestamp, ValidationError};
use crate::domain::{Article, ArticleDraft, Event, EventDraft, Resource};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/articles` and `PUT /api/articles/:id`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<String>,
}

/// Body of `POST /api/events` and `PUT /api/events/:id`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub location: Option<String>,
    pub registration_url: Option<String>,
    pub status: Option<String>,
}

/// Query parameters for public listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub status: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Error body: `{ "error": message, "code": CODE }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: code.to_string(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource_type, id),
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Request → draft
// ════════════════════════════════════════════════════════════════════════════

/// A resource the gateway serves: how its request body becomes a draft.
pub trait GatewayResource: Resource {
    type Request: DeserializeOwned + Send;

    fn into_draft(request: Self::Request) -> Result<Self::Draft, ValidationError>;

    /// Parses a JSON body into a draft.
    fn draft_from_json(body: Value) -> Result<Self::Draft, ValidationError> {
        let request = serde_json::from_value::<Self::Request>(body)
            .map_err(|e| ValidationError::invalid_format("body", e.to_string()))?;
        Self::into_draft(request)
    }
}

fn required(field: &str, value: Option<String>) -> Result<String, ValidationError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ValidationError::empty_field(field)),
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn status(value: Option<String>) -> Result<PublishStatus, ValidationError> {
    required("status", value)?.parse()
}

fn timestamp(field: &str, value: &str) -> Result<Timestamp, ValidationError> {
    Timestamp::parse(value).map_err(|_| {
        ValidationError::invalid_format(field, format!("'{}' is not an RFC 3339 timestamp", value))
    })
}

impl GatewayResource for Article {
    type Request = ArticleRequest;

    fn into_draft(request: ArticleRequest) -> Result<ArticleDraft, ValidationError> {
        Ok(ArticleDraft::new(
            required("title", request.title)?,
            required("content", request.content)?,
            status(request.status)?,
        ))
    }
}

impl GatewayResource for Event {
    type Request = EventRequest;

    fn into_draft(request: EventRequest) -> Result<EventDraft, ValidationError> {
        let start_date = timestamp("startDate", &required("startDate", request.start_date)?)?;
        let end_date = optional(request.end_date)
            .map(|end| timestamp("endDate", &end))
            .transpose()?;
        Ok(EventDraft {
            title: required("title", request.title)?,
            description: optional(request.description),
            start_date,
            end_date,
            location: optional(request.location),
            registration_url: optional(request.registration_url),
            status: status(request.status)?,
        })
    }
}
