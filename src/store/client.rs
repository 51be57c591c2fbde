use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::{Query, StoreError, StoreResult};
use crate::config::Config;

/// HTTP client for the content store.
///
/// Cheap to clone. Requests go out with the anon key unless a user access
/// token has been attached with [`StoreClient::with_access_token`], in which
/// case row-level security sees the signed-in user.
#[derive(Debug, Clone)]
pub struct StoreClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    access_token: Option<String>,
}

impl StoreClient {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            access_token: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.supabase_url, &config.supabase_anon_key)
    }

    /// A copy of this client acting on behalf of a signed-in user.
    pub fn with_access_token(&self, token: impl Into<String>) -> Self {
        Self {
            access_token: Some(token.into()),
            ..self.clone()
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Attach `apikey` and the bearer token.
    pub(crate) fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.anon_key);
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Turn a non-success response into a `StoreError::Api`.
    pub(crate) async fn check(response: Response) -> StoreResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::from_body(status, &body))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> StoreResult<T> {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Run a read query.
    pub async fn select<T: DeserializeOwned>(&self, query: &Query) -> StoreResult<Vec<T>> {
        debug!("Selecting from {}", query.table_name());
        let request = self
            .http
            .get(self.rest_url(query.table_name()))
            .query(&query.to_params());
        let response = self.authorize(request).send().await?;
        let response = Self::check(response).await?;
        Self::decode(response).await
    }

    /// Run a read query expecting at most one row.
    pub async fn select_optional<T: DeserializeOwned>(
        &self,
        query: &Query,
    ) -> StoreResult<Option<T>> {
        let rows = self.select(&query.clone().limit(1)).await?;
        Ok(rows.into_iter().next())
    }

    /// Insert one row and return it as stored.
    pub async fn insert<B, T>(&self, table: &str, row: &B) -> StoreResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("Inserting into {}", table);
        let request = self
            .http
            .post(self.rest_url(table))
            .header("Prefer", "return=representation")
            .json(&[row]);
        let response = self.authorize(request).send().await?;
        let response = Self::check(response).await?;
        let rows: Vec<T> = Self::decode(response).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(format!("inserted {} row", table)))
    }

    /// Patch every row matching the query's filters and return them.
    pub async fn update<B, T>(&self, query: &Query, changes: &B) -> StoreResult<Vec<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        if !query.has_filters() {
            return Err(StoreError::UnfilteredMutation("update"));
        }
        debug!("Updating {}", query.table_name());
        let request = self
            .http
            .patch(self.rest_url(query.table_name()))
            .query(&query.filter_params())
            .header("Prefer", "return=representation")
            .json(changes);
        let response = self.authorize(request).send().await?;
        let response = Self::check(response).await?;
        Self::decode(response).await
    }

    /// Delete every row matching the query's filters.
    pub async fn delete(&self, query: &Query) -> StoreResult<()> {
        if !query.has_filters() {
            return Err(StoreError::UnfilteredMutation("delete"));
        }
        debug!("Deleting from {}", query.table_name());
        let request = self
            .http
            .delete(self.rest_url(query.table_name()))
            .query(&query.filter_params());
        let response = self.authorize(request).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}
