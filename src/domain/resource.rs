//! The `Resource` abstraction shared by articles and events.
//!
//! Each resource has two shapes:
//!
//! - the **public shape** (`Self`), camelCase on the wire, used by callers and
//!   by the local gateway;
//! - the **persisted shape** (`Self::Row`), snake_case, used by the hosted
//!   backend's tables.
//!
//! `from_row` and `to_row` are total and mutually inverse on every field.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::foundation::{PublishStatus, RecordId, Timestamp, ValidationError};

/// The two managed resource types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Articles,
    Events,
}

/// Who a listing is for; admin listings order differently for events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    Public,
    Admin,
}

/// Column ordering applied by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub column: &'static str,
    pub ascending: bool,
}

impl ResourceKind {
    /// Table name on the hosted backend; also the gateway path segment.
    pub fn table(&self) -> &'static str {
        match self {
            ResourceKind::Articles => "articles",
            ResourceKind::Events => "events",
        }
    }

    /// Singular label for messages.
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Articles => "Article",
            ResourceKind::Events => "Event",
        }
    }

    /// Articles sort newest first everywhere. Events sort by start date,
    /// soonest first for readers and latest first for admins.
    pub fn order(&self, audience: Audience) -> SortOrder {
        match (self, audience) {
            (ResourceKind::Articles, _) => SortOrder {
                column: "created_at",
                ascending: false,
            },
            (ResourceKind::Events, Audience::Public) => SortOrder {
                column: "start_date",
                ascending: true,
            },
            (ResourceKind::Events, Audience::Admin) => SortOrder {
                column: "start_date",
                ascending: false,
            },
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table())
    }
}

impl FromStr for ResourceKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "articles" => Ok(ResourceKind::Articles),
            "events" => Ok(ResourceKind::Events),
            other => Err(ValidationError::invalid_format(
                "resource",
                format!("unknown resource '{}'", other),
            )),
        }
    }
}

/// Timestamps a write carries to the hosted backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStamp {
    /// Insert: `created_at` and `updated_at` share one instant.
    Created(Timestamp),
    /// Update: only `updated_at` moves.
    Updated(Timestamp),
}

impl WriteStamp {
    pub fn created_at(&self) -> Option<Timestamp> {
        match self {
            WriteStamp::Created(at) => Some(*at),
            WriteStamp::Updated(_) => None,
        }
    }

    pub fn updated_at(&self) -> Timestamp {
        match self {
            WriteStamp::Created(at) | WriteStamp::Updated(at) => *at,
        }
    }
}

/// A record managed through the data access layer.
pub trait Resource:
    Clone + fmt::Debug + PartialEq + Send + Sync + Serialize + DeserializeOwned + 'static
{
    /// Caller-supplied writable fields.
    type Draft: Clone + fmt::Debug + Send + Sync + 'static;

    /// Persisted (snake_case) row as stored by the hosted backend.
    type Row: Serialize + DeserializeOwned + Send;

    /// Persisted payload for inserts and updates.
    type Write: Serialize + Send;

    const KIND: ResourceKind;

    fn id(&self) -> &RecordId;

    fn status(&self) -> PublishStatus;

    fn updated_at(&self) -> Timestamp;

    /// Value of the column named by `KIND.order(..)`.
    fn order_key(&self) -> Timestamp;

    fn from_row(row: Self::Row) -> Self;

    fn to_row(&self) -> Self::Row;

    fn write_row(draft: &Self::Draft, stamp: WriteStamp) -> Self::Write;

    /// Builds a new record from a draft (gateway-side create).
    fn create(id: RecordId, draft: Self::Draft, now: Timestamp) -> Self;

    /// Replaces the writable fields and advances `updated_at`.
    fn revise(&mut self, draft: Self::Draft, now: Timestamp);

    /// Checks the rules both backends enforce on writes.
    fn validate_draft(draft: &Self::Draft) -> Result<(), ValidationError>;

    /// Comparator matching `KIND.order(audience)`.
    fn compare(a: &Self, b: &Self, audience: Audience) -> Ordering {
        let ordering = a.order_key().cmp(&b.order_key());
        if Self::KIND.order(audience).ascending {
            ordering
        } else {
            ordering.reverse()
        }
    }
}

/// Shared check for the required title.
pub(crate) fn require_text(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    Ok(())
}
