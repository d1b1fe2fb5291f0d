//! Events: dated happenings with optional location and registration link.

use serde::{Deserialize, Serialize};

use super::foundation::{PublishStatus, RecordId, Timestamp, ValidationError};
use super::resource::{require_text, Resource, ResourceKind, WriteStamp};

/// An event in its public (camelCase) shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_date: Timestamp,
    #[serde(default)]
    pub end_date: Option<Timestamp>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub registration_url: Option<String>,
    pub status: PublishStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Writable fields of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    pub title: String,
    pub description: Option<String>,
    pub start_date: Timestamp,
    pub end_date: Option<Timestamp>,
    pub location: Option<String>,
    pub registration_url: Option<String>,
    pub status: PublishStatus,
}

impl EventDraft {
    /// Draft with only the required fields set.
    pub fn new(title: impl Into<String>, start_date: Timestamp, status: PublishStatus) -> Self {
        Self {
            title: title.into(),
            description: None,
            start_date,
            end_date: None,
            location: None,
            registration_url: None,
            status,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_end_date(mut self, end_date: Timestamp) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_registration_url(mut self, url: impl Into<String>) -> Self {
        self.registration_url = Some(url.into());
        self
    }
}

/// Persisted row in the hosted `events` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRow {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(alias = "startDate")]
    pub start_date: Timestamp,
    #[serde(default, alias = "endDate")]
    pub end_date: Option<Timestamp>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, alias = "registrationUrl")]
    pub registration_url: Option<String>,
    pub status: PublishStatus,
    #[serde(alias = "createdAt")]
    pub created_at: Timestamp,
    #[serde(alias = "updatedAt")]
    pub updated_at: Timestamp,
}

/// Insert/update payload for the `events` table. Absent optionals are sent
/// as explicit nulls so an update clears them.
#[derive(Debug, Clone, Serialize)]
pub struct EventWrite {
    pub title: String,
    pub description: Option<String>,
    pub start_date: Timestamp,
    pub end_date: Option<Timestamp>,
    pub location: Option<String>,
    pub registration_url: Option<String>,
    pub status: PublishStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    pub updated_at: Timestamp,
}

impl Resource for Event {
    type Draft = EventDraft;
    type Row = EventRow;
    type Write = EventWrite;

    const KIND: ResourceKind = ResourceKind::Events;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn status(&self) -> PublishStatus {
        self.status
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn order_key(&self) -> Timestamp {
        self.start_date
    }

    fn from_row(row: EventRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            start_date: row.start_date,
            end_date: row.end_date,
            location: row.location,
            registration_url: row.registration_url,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    fn to_row(&self) -> EventRow {
        EventRow {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            location: self.location.clone(),
            registration_url: self.registration_url.clone(),
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    fn write_row(draft: &EventDraft, stamp: WriteStamp) -> EventWrite {
        EventWrite {
            title: draft.title.clone(),
            description: draft.description.clone(),
            start_date: draft.start_date,
            end_date: draft.end_date,
            location: draft.location.clone(),
            registration_url: draft.registration_url.clone(),
            status: draft.status,
            created_at: stamp.created_at(),
            updated_at: stamp.updated_at(),
        }
    }

    fn create(id: RecordId, draft: EventDraft, now: Timestamp) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            start_date: draft.start_date,
            end_date: draft.end_date,
            location: draft.location,
            registration_url: draft.registration_url,
            status: draft.status,
            created_at: now,
            updated_at: now,
        }
    }

    fn revise(&mut self, draft: EventDraft, now: Timestamp) {
        self.title = draft.title;
        self.description = draft.description;
        self.start_date = draft.start_date;
        self.end_date = draft.end_date;
        self.location = draft.location;
        self.registration_url = draft.registration_url;
        self.status = draft.status;
        self.updated_at = now.advanced_past(self.updated_at);
    }

    fn validate_draft(draft: &EventDraft) -> Result<(), ValidationError> {
        require_text("title", &draft.title)?;
        if let Some(end) = draft.end_date {
            if end.is_before(&draft.start_date) {
                return Err(ValidationError::out_of_range(
                    "endDate",
                    "must not be before startDate",
                ));
            }
        }
        Ok(())
    }
}
