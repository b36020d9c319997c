//! Transport layer for the Unsplash API.
//!
//! Every request the client makes goes through the [`Transport`] trait:
//!
//! - [`Transport::fetch`] issues one authenticated GET against the API host and
//!   returns the decoded JSON body.
//! - [`Transport::fetch_bytes`] downloads the content behind a pre-signed image
//!   URL. No credential is attached to these requests.
//!
//! [`HttpTransport`] is the production implementation on top of `reqwest`.
//! Authentication is a separate strategy value ([`Authenticator`]) handed to
//! the transport at construction, so call sites never depend on how the
//! credential is presented. [`MockTransport`] replays scripted responses for
//! tests.
//!
//! Neither implementation retries: one call is one round-trip.

mod auth;
mod http;
pub mod mock;

pub use auth::{Authenticator, ClientIdAuth};
pub use http::{HttpTransport, DEFAULT_API_URL, DEFAULT_TIMEOUT};
pub use mock::{MockTransport, RecordedCall};

use crate::models::QueryParams;
use async_trait::async_trait;

/// Query parameter carrying the API version
pub const API_VERSION_PARAM: &str = "Accept-Version";

/// API version every request is pinned to
pub const API_VERSION: &str = "v1";

/// Capability to talk to the photo API.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// GET `path` (relative to the API root) with `params` and decode the JSON body.
    ///
    /// Implementations add the API version parameter and the credential.
    async fn fetch(&self, path: &str, params: &QueryParams)
        -> Result<serde_json::Value, ApiError>;

    /// GET an absolute, pre-signed URL and return the raw body.
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError>;
}

/// Errors that can occur while talking to the API or persisting its results
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or invalid local setup (credential, destination, format)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Non-success status with the API's own error messages
    #[error("HTTP status {status}: {}", .errors.join("; "))]
    Api { status: u16, errors: Vec<String> },

    /// Non-success status whose body carried no readable error list
    #[error("HTTP status {0}")]
    Status(u16),

    /// Connection, DNS or timeout failure
    #[error("Network error: {0}")]
    Network(String),

    /// Body was not the expected JSON, or image bytes could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Writing results to disk failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// HTTP status of the failed response, if the failure was a response at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } | ApiError::Status(status) => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(format!("JSON: {}", err))
    }
}

impl From<image::ImageError> for ApiError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => ApiError::Io(e),
            other => ApiError::Decode(format!("image: {}", other)),
        }
    }
}
