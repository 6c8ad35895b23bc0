//! PostgREST table access.
//!
//! One shared [`SupabaseClient`] holds the HTTP client and endpoints;
//! [`TableQuery`] is a per-request builder mirroring the backend's query
//! string grammar (`select=…`, `{column}=eq.{value}`).

use std::sync::Arc;

use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::SupabaseConfig;

use super::{ApiError, SupabaseError};

/// Client for the hosted backend.
///
/// Cheaply cloneable via `Arc`. Table access goes through [`Self::table`];
/// authentication calls live in the `auth` module of this crate.
#[derive(Clone)]
pub struct SupabaseClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    rest_endpoint: String,
    auth_endpoint: String,
    anon_key: String,
    service_key: String,
}

impl SupabaseClient {
    /// Create a new backend client.
    #[must_use]
    pub fn new(config: &SupabaseConfig) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                http: reqwest::Client::new(),
                rest_endpoint: config.rest_endpoint(),
                auth_endpoint: config.auth_endpoint(),
                anon_key: config.anon_key.clone(),
                service_key: config.service_key.expose_secret().to_string(),
            }),
        }
    }

    /// Start a query against a table.
    #[must_use]
    pub fn table(&self, table: &str) -> TableQuery {
        TableQuery {
            client: self.clone(),
            table: table.to_string(),
            select: None,
            filters: Vec::new(),
        }
    }

    /// Check backend reachability via the GoTrue health endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or unhealthy.
    pub async fn health(&self) -> Result<(), SupabaseError> {
        let response = self
            .inner
            .http
            .get(format!("{}/health", self.inner.auth_endpoint))
            .header("apikey", &self.inner.anon_key)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    pub(super) fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }

    pub(super) fn auth_endpoint(&self) -> &str {
        &self.inner.auth_endpoint
    }

    pub(super) fn anon_key(&self) -> &str {
        &self.inner.anon_key
    }
}

/// Builder for a single PostgREST request.
pub struct TableQuery {
    client: SupabaseClient,
    table: String,
    select: Option<String>,
    filters: Vec<(String, String)>,
}

impl TableQuery {
    /// Restrict the returned columns (`select=` parameter).
    #[must_use]
    pub fn select(mut self, columns: &str) -> Self {
        self.select = Some(columns.to_string());
        self
    }

    /// Add an equality filter (`{column}=eq.{value}`).
    #[must_use]
    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters
            .push((column.to_string(), format!("eq.{}", value.to_string())));
        self
    }

    /// Fetch all matching rows.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success response, or a
    /// body that does not decode to `T`.
    pub async fn fetch<T: DeserializeOwned>(self) -> Result<Vec<T>, SupabaseError> {
        let response = self.request(reqwest::Method::GET).send().await?;
        let response = check(response).await?;
        let rows = response.json::<Vec<T>>().await?;
        Ok(rows)
    }

    /// Fetch exactly one matching row.
    ///
    /// Uses the backend's single-object representation; anything other than
    /// exactly one matching row maps to [`SupabaseError::NotFound`].
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the row count is not one, otherwise the same
    /// errors as [`Self::fetch`].
    pub async fn fetch_one<T: DeserializeOwned>(self) -> Result<T, SupabaseError> {
        let table = self.table.clone();
        let response = self
            .request(reqwest::Method::GET)
            .header("Accept", "application/vnd.pgrst.object+json")
            .send()
            .await?;

        // PostgREST answers 406 when the object representation is requested
        // and the result is not exactly one row.
        if response.status() == StatusCode::NOT_ACCEPTABLE {
            return Err(SupabaseError::NotFound(table));
        }

        let response = check(response).await?;
        let row = response.json::<T>().await?;
        Ok(row)
    }

    /// Insert a row.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success response.
    pub async fn insert<T: Serialize + Sync>(self, row: &T) -> Result<(), SupabaseError> {
        let response = self
            .request(reqwest::Method::POST)
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    /// Update all matching rows with the given patch.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success response.
    pub async fn update<T: Serialize + Sync>(self, patch: &T) -> Result<(), SupabaseError> {
        let response = self
            .request(reqwest::Method::PATCH)
            .header("Prefer", "return=minimal")
            .json(patch)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    /// Delete all matching rows.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success response.
    pub async fn delete(self) -> Result<(), SupabaseError> {
        let response = self.request(reqwest::Method::DELETE).send().await?;
        check(response).await?;
        Ok(())
    }

    fn request(&self, method: reqwest::Method) -> reqwest::RequestBuilder {
        let inner = &self.client.inner;
        let mut query: Vec<(String, String)> = Vec::new();
        if let Some(select) = &self.select {
            query.push(("select".to_string(), select.clone()));
        }
        query.extend(self.filters.iter().cloned());

        inner
            .http
            .request(method, format!("{}/{}", inner.rest_endpoint, self.table))
            .header("apikey", &inner.service_key)
            .header("Authorization", format!("Bearer {}", inner.service_key))
            .query(&query)
    }
}

/// Map a non-success response to [`SupabaseError`], passing success through.
pub(super) async fn check(response: reqwest::Response) -> Result<reqwest::Response, SupabaseError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(1);
        return Err(SupabaseError::RateLimited(retry_after));
    }

    let body = response.text().await.unwrap_or_default();
    let mut api = serde_json::from_str::<ApiError>(&body).unwrap_or_default();
    api.status = status.as_u16();
    if api.message.is_empty() {
        // Keep a short prefix of whatever the backend sent for diagnostics.
        api.message = body.chars().take(200).collect();
    }

    tracing::debug!(status = %status, message = %api.message, "backend returned non-success status");
    Err(SupabaseError::Api(api))
}
