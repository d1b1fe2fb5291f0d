//! Hosted backend port.
//!
//! Contract for the externally operated data service: table queries with
//! equality filters, ordering, inclusive ranges and exact counts; row
//! insert/update/delete; and the session accessors of its auth subsystem.
//!
//! Rows travel as `serde_json::Value` in the persisted (snake_case) shape.
//! Mapping to the public shape is the facade's job.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::foundation::{AuthError, RecordId, Session};
use crate::domain::SortOrder;

/// Postgres: relation does not exist.
pub const CODE_RELATION_MISSING: &str = "42P01";
/// PostgREST: `.single()` matched no rows.
pub const CODE_NO_ROWS: &str = "PGRST116";

/// Codes the hosted backend uses for rejected payloads.
const VALIDATION_CODES: &[&str] = &["23502", "23514", "22P02", "22007", "22008"];

/// Error reported by the hosted backend.
///
/// Carries the machine-readable code when the backend sends one; the message
/// is preserved verbatim for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HostedError {
    pub code: Option<String>,
    pub message: String,
    pub status: Option<u16>,
}

impl HostedError {
    pub fn new(code: Option<String>, message: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            code,
            message: message.into(),
            status,
        }
    }

    /// Error without a backend code (transport, decoding).
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(None, message, None)
    }

    pub fn relation_missing(table: &str) -> Self {
        Self::new(
            Some(CODE_RELATION_MISSING.to_string()),
            format!("relation \"public.{}\" does not exist", table),
            Some(404),
        )
    }

    pub fn no_rows() -> Self {
        Self::new(
            Some(CODE_NO_ROWS.to_string()),
            "JSON object requested, multiple (or no) rows returned",
            Some(406),
        )
    }

    pub fn validation(code: &str, message: impl Into<String>) -> Self {
        Self::new(Some(code.to_string()), message, Some(400))
    }

    /// The table/collection has not been provisioned yet.
    pub fn is_relation_missing(&self) -> bool {
        self.code.as_deref() == Some(CODE_RELATION_MISSING)
            || self.message.contains("does not exist")
    }

    /// An update or single-row read matched nothing.
    pub fn is_no_rows(&self) -> bool {
        self.code.as_deref() == Some(CODE_NO_ROWS)
    }

    /// The backend rejected the payload itself.
    pub fn is_validation(&self) -> bool {
        match self.code.as_deref() {
            Some(code) => VALIDATION_CODES.contains(&code),
            None => self.status == Some(400),
        }
    }
}

/// A table query: `select *` plus optional filter, order, range and count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    pub table: String,
    /// Equality filters, `column = value`.
    pub filters: Vec<(String, String)>,
    pub order: Option<SortOrder>,
    /// Inclusive row range.
    pub range: Option<(u64, u64)>,
    /// Ask for the exact number of matching rows.
    pub count_exact: bool,
}

impl TableQuery {
    pub fn from(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filters: Vec::new(),
            order: None,
            range: None,
            count_exact: false,
        }
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((column.into(), value.into()));
        self
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = Some(order);
        self
    }

    pub fn range(mut self, from: u64, to: u64) -> Self {
        self.range = Some((from, to));
        self
    }

    pub fn with_count(mut self) -> Self {
        self.count_exact = true;
        self
    }
}

/// Rows returned by a select, plus the exact count when requested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub rows: Vec<Value>,
    pub count: Option<u64>,
}

/// Authenticated client handle for the hosted backend.
///
/// One instance per process holds the session; see `ClientManager`.
#[async_trait]
pub trait HostedBackend: Send + Sync {
    /// Runs a select against a table.
    async fn select(&self, query: &TableQuery) -> Result<QueryResult, HostedError>;

    /// Inserts one row and returns it as stored.
    async fn insert(&self, table: &str, row: Value) -> Result<Value, HostedError>;

    /// Updates the row with `id` and returns it as stored.
    ///
    /// Returns an error with code `PGRST116` when no row matches.
    async fn update(&self, table: &str, id: &RecordId, row: Value) -> Result<Value, HostedError>;

    /// Deletes the row with `id`, returning the number of rows removed.
    async fn delete(&self, table: &str, id: &RecordId) -> Result<u64, HostedError>;

    /// Current session, if any.
    async fn get_session(&self) -> Result<Option<Session>, AuthError>;

    /// Signs in with email and password, storing the session in the handle.
    async fn sign_in_with_password(&self, email: &str, password: &str)
        -> Result<Session, AuthError>;

    /// Ends the current session.
    async fn sign_out(&self) -> Result<(), AuthError>;
}
