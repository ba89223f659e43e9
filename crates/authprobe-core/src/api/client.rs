//! API client for the portal's auth and test endpoints.
//!
//! Requests are sent exactly once. There is no retry or backoff; any
//! failure is returned to the caller, which decides what the user sees.

use std::time::Duration;

use anyhow::Result;
use reqwest::{header, Client, Url};
use tracing::debug;

use crate::auth::SessionData;
use crate::models::{Credentials, Endpoint};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Default backend location
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Login endpoint path
const LOGIN_PATH: &str = "/api/auth/login";

/// Logout endpoint path
const LOGOUT_PATH: &str = "/api/auth/logout";

/// HTTP request timeout in seconds.
/// A hung request fails like any other error instead of freezing the form.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// API client for the portal backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client for `base_url`
    pub fn new(base_url: Url) -> Result<Self> {
        // Paths are appended to the base, so a query or fragment would swallow them
        if !matches!(base_url.scheme(), "http" | "https")
            || base_url.query().is_some()
            || base_url.fragment().is_some()
        {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()).into());
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    /// POST the credentials to the login endpoint and parse the session
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<SessionData> {
        let url = self.url(LOGIN_PATH);
        debug!(url = %url, username = %credentials.username, "Sending login request");

        let response = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .json(credentials)
            .send()
            .await
            .map_err(ApiError::NetworkError)?;

        let response = Self::check_response(response).await?;
        let body = response.text().await.map_err(ApiError::NetworkError)?;

        let session: SessionData = serde_json::from_str(&body).map_err(ApiError::Decode)?;

        Ok(session.received_now())
    }

    /// GET a role-gated test endpoint, returning the body as display text
    pub async fn probe(&self, endpoint: Endpoint, token: &str) -> Result<String> {
        let url = self.url(&endpoint.path());
        debug!(url = %url, "Probing endpoint");

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(ApiError::NetworkError)?;

        let response = Self::check_response(response).await?;
        let body = response.text().await.map_err(ApiError::NetworkError)?;

        Ok(message_from_body(&body))
    }

    /// Tell the server we are logging out. The backend keeps no session
    /// state, so this only returns its acknowledgement text.
    pub async fn logout(&self, token: Option<&str>) -> Result<String> {
        let url = self.url(LOGOUT_PATH);
        debug!(url = %url, "Sending logout request");

        let mut request = self.client.get(&url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(ApiError::NetworkError)?;

        let response = Self::check_response(response).await?;
        let body = response.text().await.map_err(ApiError::NetworkError)?;

        Ok(message_from_body(&body))
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }
}

/// Turn a response body into message text.
/// A JSON string is unquoted; anything else is shown as sent.
pub fn message_from_body(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::String(s)) => s,
        _ => body.trim().to_string(),
    }
}
