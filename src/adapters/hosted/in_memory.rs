//! In-memory hosted backend for testing and local development.
//!
//! `InMemoryHostedService` plays the externally operated service: tables of
//! snake_case JSON rows, registered users, and the checks the real tables
//! enforce. `InMemoryHostedBackend` is one client handle onto it with its own
//! session, and `InMemoryClientFactory` hands out handles after a
//! configurable number of readiness polls.
//!
//! # Example
//!
//! ```ignore
//! let service = Arc::new(
//!     InMemoryHostedService::new().with_user("editor@example.org", "secret"),
//! );
//! let factory = InMemoryClientFactory::new(service.clone()).ready_after(3);
//! ```

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering as AtomicOrdering};
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::foundation::{
    AuthError, PublishStatus, RecordId, Session, SessionUser, Timestamp,
};
use crate::domain::ResourceKind;
use crate::ports::{HostedBackend, HostedClientFactory, HostedError, QueryResult, TableQuery};

/// Columns that must be present and non-null, per table.
fn required_columns(table: &str) -> &'static [&'static str] {
    match table {
        "events" => &["title", "start_date", "status"],
        _ => &["title", "content", "status"],
    }
}

/// Timestamp columns, per table.
fn timestamp_columns(table: &str) -> &'static [&'static str] {
    match table {
        "events" => &["start_date", "end_date", "created_at", "updated_at"],
        _ => &["created_at", "updated_at"],
    }
}

/// Stand-in for the hosted data service.
#[derive(Debug)]
pub struct InMemoryHostedService {
    /// Provisioned tables; a missing key is an unprovisioned relation
    tables: RwLock<HashMap<String, Vec<Value>>>,
    /// email -> (password, user)
    users: RwLock<HashMap<String, (String, SessionUser)>>,
    /// Optional error returned by every table operation
    force_error: RwLock<Option<HostedError>>,
    table_calls: AtomicUsize,
}

impl Default for InMemoryHostedService {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryHostedService {
    /// Service with empty `articles` and `events` tables.
    pub fn new() -> Self {
        let tables = [ResourceKind::Articles, ResourceKind::Events]
            .iter()
            .map(|kind| (kind.table().to_string(), Vec::new()))
            .collect();
        Self {
            tables: RwLock::new(tables),
            users: RwLock::new(HashMap::new()),
            force_error: RwLock::new(None),
            table_calls: AtomicUsize::new(0),
        }
    }

    /// Drops a table so that queries against it report a missing relation.
    pub fn without_table(self, kind: ResourceKind) -> Self {
        self.tables
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(kind.table());
        self
    }

    /// Registers a user that can sign in with `password`.
    pub fn with_user(self, email: impl Into<String>, password: impl Into<String>) -> Self {
        let email = email.into();
        let user = SessionUser::new(RecordId::generate().to_string(), Some(email.clone()));
        self.users
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(email, (password.into(), user));
        self
    }

    /// Seeds rows (snake_case) into a provisioned table.
    pub fn with_rows(self, kind: ResourceKind, rows: Vec<Value>) -> Self {
        if let Some(table) = self
            .tables
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(kind.table())
        {
            table.extend(rows);
        }
        self
    }

    /// Forces every table operation to fail with `error`.
    pub fn fail_with(&self, error: HostedError) {
        *self.force_error.write().unwrap_or_else(PoisonError::into_inner) = Some(error);
    }

    /// Returns to normal operation.
    pub fn clear_error(&self) {
        *self.force_error.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Number of table operations received (selects and writes).
    pub fn table_calls(&self) -> usize {
        self.table_calls.load(AtomicOrdering::SeqCst)
    }

    /// Snapshot of a table's rows in insertion order.
    pub fn rows(&self, kind: ResourceKind) -> Vec<Value> {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(kind.table())
            .cloned()
            .unwrap_or_default()
    }

    fn begin(&self) -> Result<(), HostedError> {
        self.table_calls.fetch_add(1, AtomicOrdering::SeqCst);
        match self
            .force_error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn authenticate(&self, email: &str, password: &str) -> Option<SessionUser> {
        self.users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(email)
            .filter(|(expected, _)| expected == password)
            .map(|(_, user)| user.clone())
    }

    fn select(&self, query: &TableQuery) -> Result<QueryResult, HostedError> {
        self.begin()?;
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        let table = tables
            .get(&query.table)
            .ok_or_else(|| HostedError::relation_missing(&query.table))?;

        let mut rows: Vec<Value> = table
            .iter()
            .filter(|row| {
                query
                    .filters
                    .iter()
                    .all(|(column, value)| {
                        column_text(row, column).as_deref() == Some(value.as_str())
                    })
            })
            .cloned()
            .collect();

        if let Some(order) = query.order {
            rows.sort_by(|a, b| {
                let ordering = compare_timestamps(a, b, order.column);
                if order.ascending {
                    ordering
                } else {
                    ordering.reverse()
                }
            });
        }

        let count = query.count_exact.then_some(rows.len() as u64);
        if let Some((from, to)) = query.range {
            rows = rows
                .into_iter()
                .skip(from as usize)
                .take((to.saturating_sub(from) + 1) as usize)
                .collect();
        }
        Ok(QueryResult { rows, count })
    }

    fn insert(&self, table: &str, row: Value) -> Result<Value, HostedError> {
        self.begin()?;
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| HostedError::relation_missing(table))?;

        let mut fields = into_object(row)?;
        let now = timestamp_value(Timestamp::now());
        fields
            .entry("id")
            .or_insert_with(|| Value::String(RecordId::generate().to_string()));
        fields.entry("created_at").or_insert_with(|| now.clone());
        fields.entry("updated_at").or_insert(now);
        check_row(table, &fields)?;

        let stored = Value::Object(fields);
        rows.push(stored.clone());
        Ok(stored)
    }

    fn update(&self, table: &str, id: &RecordId, patch: Value) -> Result<Value, HostedError> {
        self.begin()?;
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| HostedError::relation_missing(table))?;
        let existing = rows
            .iter_mut()
            .find(|row| column_text(row, "id").as_deref() == Some(id.as_str()))
            .ok_or_else(HostedError::no_rows)?;

        let previous = existing
            .get("updated_at")
            .and_then(Value::as_str)
            .and_then(|s| Timestamp::parse(s).ok());
        let mut merged = existing.as_object().cloned().unwrap_or_default();
        for (column, value) in into_object(patch)? {
            merged.insert(column, value);
        }
        let requested = merged
            .get("updated_at")
            .and_then(Value::as_str)
            .and_then(|s| Timestamp::parse(s).ok())
            .unwrap_or_else(Timestamp::now);
        let updated_at = match previous {
            Some(previous) => requested.advanced_past(previous),
            None => requested,
        };
        merged.insert("updated_at".to_string(), timestamp_value(updated_at));
        check_row(table, &merged)?;

        *existing = Value::Object(merged);
        Ok(existing.clone())
    }

    fn delete(&self, table: &str, id: &RecordId) -> Result<u64, HostedError> {
        self.begin()?;
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| HostedError::relation_missing(table))?;
        let before = rows.len();
        rows.retain(|row| column_text(row, "id").as_deref() != Some(id.as_str()));
        Ok((before - rows.len()) as u64)
    }
}

/// Full-precision timestamp text, as the table stores it.
fn timestamp_value(at: Timestamp) -> Value {
    Value::String(
        at.as_datetime()
            .to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true),
    )
}

fn into_object(row: Value) -> Result<Map<String, Value>, HostedError> {
    match row {
        Value::Object(fields) => Ok(fields),
        _ => Err(HostedError::validation("22P02", "row payload must be an object")),
    }
}

/// Column value as text, the way an `eq` filter compares it.
fn column_text(row: &Value, column: &str) -> Option<String> {
    match row.get(column)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn compare_timestamps(a: &Value, b: &Value, column: &str) -> Ordering {
    let parse = |row: &Value| {
        row.get(column)
            .and_then(Value::as_str)
            .and_then(|s| Timestamp::parse(s).ok())
    };
    parse(a).cmp(&parse(b))
}

/// Not-null, check and type constraints of the hosted tables.
fn check_row(table: &str, fields: &Map<String, Value>) -> Result<(), HostedError> {
    for column in required_columns(table) {
        if fields.get(*column).map_or(true, Value::is_null) {
            return Err(HostedError::validation(
                "23502",
                format!(
                    "null value in column \"{}\" of relation \"{}\" violates not-null constraint",
                    column, table
                ),
            ));
        }
    }

    let status = fields.get("status").and_then(Value::as_str).unwrap_or_default();
    if status.parse::<PublishStatus>().is_err() {
        return Err(HostedError::validation(
            "23514",
            format!(
                "new row for relation \"{}\" violates check constraint \"{}_status_check\"",
                table, table
            ),
        ));
    }

    for column in timestamp_columns(table) {
        match fields.get(*column) {
            None | Some(Value::Null) => {}
            Some(Value::String(s)) if Timestamp::parse(s).is_ok() => {}
            Some(other) => {
                return Err(HostedError::validation(
                    "22007",
                    format!("invalid input syntax for type timestamp: {}", other),
                ))
            }
        }
    }
    Ok(())
}

/// One client handle onto an `InMemoryHostedService`.
#[derive(Debug)]
pub struct InMemoryHostedBackend {
    service: Arc<InMemoryHostedService>,
    session: RwLock<Option<Session>>,
}

impl InMemoryHostedBackend {
    pub fn new(service: Arc<InMemoryHostedService>) -> Self {
        Self {
            service,
            session: RwLock::new(None),
        }
    }

    /// Handle that already holds a session for `user`.
    pub fn signed_in(service: Arc<InMemoryHostedService>, user: SessionUser) -> Self {
        let backend = Self::new(service);
        *backend.session.write().unwrap_or_else(PoisonError::into_inner) =
            Some(issue_session(user));
        backend
    }
}

fn issue_session(user: SessionUser) -> Session {
    Session::new(
        format!("token-{}", RecordId::generate()),
        user,
        Some(Timestamp::now().add_days(1)),
    )
}

#[async_trait]
impl HostedBackend for InMemoryHostedBackend {
    async fn select(&self, query: &TableQuery) -> Result<QueryResult, HostedError> {
        self.service.select(query)
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Value, HostedError> {
        self.service.insert(table, row)
    }

    async fn update(&self, table: &str, id: &RecordId, row: Value) -> Result<Value, HostedError> {
        self.service.update(table, id, row)
    }

    async fn delete(&self, table: &str, id: &RecordId) -> Result<u64, HostedError> {
        self.service.delete(table, id)
    }

    async fn get_session(&self) -> Result<Option<Session>, AuthError> {
        Ok(self
            .session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let user = self
            .service
            .authenticate(email, password)
            .ok_or(AuthError::InvalidCredentials)?;
        let session = issue_session(user);
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Factory that reports ready after a number of polls.
#[derive(Debug)]
pub struct InMemoryClientFactory {
    service: Arc<InMemoryHostedService>,
    ready_after: Option<u32>,
    polls: AtomicU32,
    constructions: AtomicUsize,
}

impl InMemoryClientFactory {
    /// Factory that is ready on the first poll.
    pub fn new(service: Arc<InMemoryHostedService>) -> Self {
        Self {
            service,
            ready_after: Some(1),
            polls: AtomicU32::new(0),
            constructions: AtomicUsize::new(0),
        }
    }

    /// Becomes ready on poll number `polls` (1-based).
    pub fn ready_after(mut self, polls: u32) -> Self {
        self.ready_after = Some(polls.max(1));
        self
    }

    /// Never becomes ready.
    pub fn never_ready(mut self) -> Self {
        self.ready_after = None;
        self
    }

    /// Number of readiness polls so far.
    pub fn polls(&self) -> u32 {
        self.polls.load(AtomicOrdering::SeqCst)
    }

    /// Number of handles built so far.
    pub fn constructions(&self) -> usize {
        self.constructions.load(AtomicOrdering::SeqCst)
    }
}

#[async_trait]
impl HostedClientFactory for InMemoryClientFactory {
    async fn is_ready(&self) -> bool {
        let poll = self.polls.fetch_add(1, AtomicOrdering::SeqCst) + 1;
        self.ready_after.is_some_and(|after| poll >= after)
    }

    fn create(&self) -> Result<Arc<dyn HostedBackend>, HostedError> {
        self.constructions.fetch_add(1, AtomicOrdering::SeqCst);
        Ok(Arc::new(InMemoryHostedBackend::new(self.service.clone())))
    }
}
