//! HTTP transport on top of `reqwest`.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use super::{ApiError, Authenticator, Transport, API_VERSION, API_VERSION_PARAM};
use crate::models::QueryParams;

/// Root of the public API
pub const DEFAULT_API_URL: &str = "https://api.unsplash.com/";

/// Whole-request timeout used when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Error body the API sends with non-success statuses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<String>,
}

/// Transport talking to the real API
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Arc<Client>,
    base_url: Url,
    auth: Arc<dyn Authenticator>,
}

impl HttpTransport {
    /// Create a transport for the public API host with the default timeout
    pub fn new(auth: Arc<dyn Authenticator>) -> Result<Self, ApiError> {
        Self::with_settings(DEFAULT_API_URL, DEFAULT_TIMEOUT, auth)
    }

    /// Create a transport for `base_url` with a request timeout
    pub fn with_settings(
        base_url: &str,
        timeout: Duration,
        auth: Arc<dyn Authenticator>,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .build()
            .map_err(|e| ApiError::Configuration(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client: Arc::new(client),
            base_url: parse_base_url(base_url)?,
            auth,
        })
    }

    /// API root requests are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::Configuration(format!("invalid endpoint '{}': {}", path, e)))
    }
}

/// Parse the API root, making sure relative joins keep its path
fn parse_base_url(base_url: &str) -> Result<Url, ApiError> {
    let mut normalized = base_url.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Url::parse(&normalized)
        .map_err(|e| ApiError::Configuration(format!("invalid API url '{}': {}", base_url, e)))
}

/// Turn a non-success response into an error, keeping the API's messages
async fn error_for_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorBody>(&body) {
        Ok(parsed) if !parsed.errors.is_empty() => Err(ApiError::Api {
            status: status.as_u16(),
            errors: parsed.errors,
        }),
        _ => Err(ApiError::Status(status.as_u16())),
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(
        &self,
        path: &str,
        params: &QueryParams,
    ) -> Result<serde_json::Value, ApiError> {
        let url = self.endpoint(path)?;

        let mut query = params.clone();
        query.insert(API_VERSION_PARAM.to_string(), API_VERSION.to_string());

        tracing::debug!(%url, ?query, scheme = self.auth.scheme(), "GET");

        let response = self
            .auth
            .authorize(self.client.get(url).query(&query))
            .send()
            .await
            .map_err(|e| ApiError::Network(format!("GET {} failed: {}", path, e)))?;

        let response = error_for_status(response).await?;

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("failed to read response body: {}", e)))?;

        Ok(serde_json::from_str(&body)?)
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        tracing::debug!(%url, "GET bytes");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Network(format!("GET {} failed: {}", url, e)))?;

        let response = error_for_status(response).await?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(format!("failed to read image body: {}", e)))?;

        Ok(bytes.to_vec())
    }
}
