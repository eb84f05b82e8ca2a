use std::time::Duration;

use reqwest::{Client, Response};
use serde::Serialize;
use tracing::debug;

use crate::error::{ApiError, ApiResult};

/// Default backend location when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Environment variable overriding the backend base URL.
pub const BASE_URL_ENV: &str = "ATRIUM_BACKEND_URL";

/// Client for the dashboard backend.
///
/// Holds a cookie store so the session established by `user_login` /
/// `admin_login` is carried on every subsequent call.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client against the given base URL.
    pub fn new(base_url: &str) -> Self {
        // RAG responses can take minutes; everything else finishes well within.
        let client = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(300))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create a client from `ATRIUM_BACKEND_URL`, falling back to the default.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(&base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) async fn get(&self, path: &str, query: &[(&str, &str)]) -> ApiResult<Response> {
        debug!(path, "GET");
        let response = self
            .client
            .get(self.url(path))
            .query(query)
            .send()
            .await?;
        Self::check(response).await
    }

    pub(crate) async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> ApiResult<Response> {
        debug!(path, "POST");
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await?;
        Self::check(response).await
    }

    /// POST with query parameters and an empty body (the backend reads
    /// several write endpoints from the query string).
    pub(crate) async fn post_query(&self, path: &str, query: &[(&str, &str)]) -> ApiResult<Response> {
        debug!(path, "POST");
        let response = self
            .client
            .post(self.url(path))
            .query(query)
            .send()
            .await?;
        Self::check(response).await
    }

    pub(crate) async fn put_query(&self, path: &str, query: &[(&str, &str)]) -> ApiResult<Response> {
        debug!(path, "PUT");
        let response = self
            .client
            .put(self.url(path))
            .query(query)
            .send()
            .await?;
        Self::check(response).await
    }

    pub(crate) async fn delete(&self, path: &str, query: &[(&str, &str)]) -> ApiResult<Response> {
        debug!(path, "DELETE");
        let response = self
            .client
            .delete(self.url(path))
            .query(query)
            .send()
            .await?;
        Self::check(response).await
    }

    pub(crate) async fn post_multipart(
        &self,
        path: &str,
        query: &[(&str, &str)],
        form: reqwest::multipart::Form,
    ) -> ApiResult<Response> {
        debug!(path, "POST multipart");
        let response = self
            .client
            .post(self.url(path))
            .query(query)
            .multipart(form)
            .send()
            .await?;
        Self::check(response).await
    }

    /// Convert non-2xx responses into `ApiError::Status`, pulling a
    /// structured `{"message": ...}` out of the body when the backend
    /// provides one.
    async fn check(response: Response) -> ApiResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
            .unwrap_or(body);

        Err(ApiError::Status { status, message })
    }
}
