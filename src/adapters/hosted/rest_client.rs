//! REST adapter for the hosted backend.
//!
//! Talks to a Supabase-style project over HTTP:
//!
//! - tables under `/rest/v1/{table}` (PostgREST query syntax, `Range` header
//!   for windows, `Prefer: count=exact` for totals read from `Content-Range`)
//! - auth under `/auth/v1` (password grant, logout, health)
//!
//! Every request carries the project's public key in the `apikey` header.
//! Table requests are authorized with the session token when one is held and
//! with the public key otherwise.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_RANGE};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::RwLock;

use crate::config::HostedConfig;
use crate::domain::foundation::{AuthError, RecordId, Session, SessionUser, Timestamp};
use crate::ports::{HostedBackend, HostedClientFactory, HostedError, QueryResult, TableQuery};

/// Error body returned by the table API.
#[derive(Debug, Default, Deserialize)]
struct RestErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Token response from the password grant.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: TokenUser,
}

#[derive(Debug, Deserialize)]
struct TokenUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

impl TokenResponse {
    fn into_session(self) -> Session {
        let expires_at = match (self.expires_at, self.expires_in) {
            (Some(at), _) => chrono::DateTime::from_timestamp(at, 0).map(Timestamp::from_datetime),
            (None, Some(secs)) => Some(Timestamp::from_datetime(
                chrono::Utc::now() + chrono::Duration::seconds(secs),
            )),
            (None, None) => None,
        };
        Session::new(
            self.access_token,
            SessionUser::new(self.user.id, self.user.email),
            expires_at,
        )
    }
}

/// Hosted backend client handle over REST.
pub struct RestHostedBackend {
    base_url: String,
    anon_key: Secret<String>,
    http_client: Client,
    session: RwLock<Option<Session>>,
}

impl RestHostedBackend {
    pub fn new(config: &HostedConfig) -> Result<Self, HostedError> {
        let http_client = build_http_client(config)?;
        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            http_client,
            session: RwLock::new(None),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    /// Bearer token for table requests.
    async fn bearer(&self) -> String {
        match self.session.read().await.as_ref() {
            Some(session) => session.access_token().to_string(),
            None => self.anon_key.expose_secret().clone(),
        }
    }

    async fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", self.anon_key.expose_secret())
            .bearer_auth(self.bearer().await)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, HostedError> {
        self.authorized(request).await.send().await.map_err(|e| {
            tracing::error!("Hosted backend request failed: {}", e);
            HostedError::transport(format!("Hosted backend unreachable: {}", e))
        })
    }

    async fn rows(response: Response) -> Result<Vec<Value>, HostedError> {
        response.json::<Vec<Value>>().await.map_err(|e| {
            tracing::error!("Failed to decode hosted backend rows: {}", e);
            HostedError::transport(format!("Malformed response: {}", e))
        })
    }
}

fn build_http_client(config: &HostedConfig) -> Result<Client, HostedError> {
    Client::builder()
        .timeout(config.request_timeout())
        .build()
        .map_err(|e| HostedError::transport(format!("Failed to create HTTP client: {}", e)))
}

/// Turns a non-success table response into a `HostedError`.
async fn table_error(response: Response) -> HostedError {
    let status = response.status().as_u16();
    let body = response.json::<RestErrorBody>().await.unwrap_or_default();
    let message = body
        .message
        .unwrap_or_else(|| format!("Hosted backend returned {}", status));
    HostedError::new(body.code, message, Some(status))
}

/// Total from a `Content-Range` header such as `0-8/42` or `*/0`.
fn parse_total(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_RANGE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.rsplit('/').next())
        .and_then(|total| total.parse().ok())
}

fn eq_filter(value: &str) -> String {
    format!("eq.{}", value)
}

#[async_trait]
impl HostedBackend for RestHostedBackend {
    async fn select(&self, query: &TableQuery) -> Result<QueryResult, HostedError> {
        let mut params: Vec<(String, String)> = vec![("select".to_string(), "*".to_string())];
        for (column, value) in &query.filters {
            params.push((column.clone(), eq_filter(value)));
        }
        if let Some(order) = query.order {
            let direction = if order.ascending { "asc" } else { "desc" };
            params.push(("order".to_string(), format!("{}.{}", order.column, direction)));
        }

        let mut request = self.http_client.get(self.table_url(&query.table)).query(&params);
        if let Some((from, to)) = query.range {
            request = request
                .header("Range-Unit", "items")
                .header("Range", format!("{}-{}", from, to));
        }
        if query.count_exact {
            request = request.header("Prefer", "count=exact");
        }

        let response = self.send(request).await?;
        let status = response.status();
        let count = if query.count_exact {
            parse_total(response.headers())
        } else {
            None
        };

        // A window past the last row is an empty page, not a failure.
        if status == StatusCode::RANGE_NOT_SATISFIABLE && query.range.is_some() {
            return Ok(QueryResult {
                rows: Vec::new(),
                count,
            });
        }
        if !status.is_success() {
            return Err(table_error(response).await);
        }

        let rows = Self::rows(response).await?;
        tracing::debug!(table = %query.table, rows = rows.len(), "Hosted select");
        Ok(QueryResult { rows, count })
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Value, HostedError> {
        let request = self
            .http_client
            .post(self.table_url(table))
            .header("Prefer", "return=representation")
            .json(&row);
        let response = self.send(request).await?;
        if !response.status().is_success() {
            return Err(table_error(response).await);
        }
        Self::rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(HostedError::no_rows)
    }

    async fn update(&self, table: &str, id: &RecordId, row: Value) -> Result<Value, HostedError> {
        let request = self
            .http_client
            .patch(self.table_url(table))
            .query(&[("id", eq_filter(id.as_str()))])
            .header("Prefer", "return=representation")
            .json(&row);
        let response = self.send(request).await?;
        if !response.status().is_success() {
            return Err(table_error(response).await);
        }
        Self::rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(HostedError::no_rows)
    }

    async fn delete(&self, table: &str, id: &RecordId) -> Result<u64, HostedError> {
        let request = self
            .http_client
            .delete(self.table_url(table))
            .query(&[("id", eq_filter(id.as_str()))])
            .header("Prefer", "return=representation");
        let response = self.send(request).await?;
        if !response.status().is_success() {
            return Err(table_error(response).await);
        }
        Ok(Self::rows(response).await?.len() as u64)
    }

    async fn get_session(&self) -> Result<Option<Session>, AuthError> {
        let mut session = self.session.write().await;
        if session
            .as_ref()
            .is_some_and(|s| s.is_expired_at(Timestamp::now()))
        {
            tracing::debug!("Stored session expired");
            *session = None;
        }
        Ok(session.clone())
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let response = self
            .http_client
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", self.anon_key.expose_secret())
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Sign-in request failed: {}", e);
                AuthError::service_unavailable(format!("Sign-in request failed: {}", e))
            })?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            return Err(AuthError::InvalidCredentials);
        }
        if !status.is_success() {
            tracing::error!("Auth endpoint returned {}", status);
            return Err(AuthError::service_unavailable(format!(
                "Auth endpoint returned {}",
                status
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse token response: {}", e);
            AuthError::service_unavailable(format!("Failed to parse token response: {}", e))
        })?;
        let session = token.into_session();
        *self.session.write().await = Some(session.clone());
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let Some(session) = self.session.write().await.take() else {
            return Ok(());
        };

        let response = self
            .http_client
            .post(self.auth_url("logout"))
            .header("apikey", self.anon_key.expose_secret())
            .bearer_auth(session.access_token())
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Sign-out request failed: {}", e);
                AuthError::service_unavailable(format!("Sign-out request failed: {}", e))
            })?;

        let status = response.status();
        // An already-revoked token still counts as signed out.
        if !status.is_success() && status != StatusCode::UNAUTHORIZED {
            return Err(AuthError::service_unavailable(format!(
                "Logout endpoint returned {}",
                status
            )));
        }
        Ok(())
    }
}

/// Builds `RestHostedBackend` handles once the project's health endpoint
/// answers.
pub struct RestClientFactory {
    config: HostedConfig,
    http_client: Client,
}

impl RestClientFactory {
    pub fn new(config: HostedConfig) -> Result<Self, HostedError> {
        let http_client = build_http_client(&config)?;
        Ok(Self {
            config,
            http_client,
        })
    }

    fn health_url(&self) -> String {
        format!("{}/auth/v1/health", self.config.url.trim_end_matches('/'))
    }
}

#[async_trait]
impl HostedClientFactory for RestClientFactory {
    async fn is_ready(&self) -> bool {
        let apikey = match HeaderValue::from_str(self.config.anon_key()) {
            Ok(value) => value,
            Err(_) => return false,
        };
        match self
            .http_client
            .get(self.health_url())
            .header("apikey", apikey)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!("Hosted backend not ready: {}", e);
                false
            }
        }
    }

    fn create(&self) -> Result<Arc<dyn HostedBackend>, HostedError> {
        Ok(Arc::new(RestHostedBackend::new(&self.config)?))
    }
}
