//! Mock transport for testing purposes.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{ApiError, Transport};
use crate::models::{PhotoUrls, QueryParams};

/// A request the mock received
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Fetch { path: String, params: QueryParams },
    Bytes { url: String },
}

/// A transport that replays scripted responses in order and records every call.
///
/// Running out of scripted responses is reported as a network error.
#[derive(Debug, Default)]
pub struct MockTransport {
    json: Mutex<VecDeque<Result<serde_json::Value, ApiError>>>,
    bytes: Mutex<VecDeque<Result<Vec<u8>, ApiError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockTransport {
    /// Create a mock with nothing scripted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON body for the next `fetch`.
    pub fn push_json(&self, body: serde_json::Value) -> &Self {
        lock(&self.json).push_back(Ok(body));
        self
    }

    /// Queue a failure for the next `fetch`.
    pub fn push_error(&self, err: ApiError) -> &Self {
        lock(&self.json).push_back(Err(err));
        self
    }

    /// Queue a body for the next `fetch_bytes`.
    pub fn push_bytes(&self, body: Vec<u8>) -> &Self {
        lock(&self.bytes).push_back(Ok(body));
        self
    }

    /// Queue a failure for the next `fetch_bytes`.
    pub fn push_bytes_error(&self, err: ApiError) -> &Self {
        lock(&self.bytes).push_back(Err(err));
        self
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    /// Parameters of every `fetch` received so far.
    pub fn fetched_params(&self) -> Vec<QueryParams> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                RecordedCall::Fetch { params, .. } => Some(params.clone()),
                RecordedCall::Bytes { .. } => None,
            })
            .collect()
    }

    /// Number of `fetch` calls received.
    pub fn fetch_count(&self) -> usize {
        self.fetched_params().len()
    }

    /// Number of `fetch_bytes` calls received.
    pub fn bytes_count(&self) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|call| matches!(call, RecordedCall::Bytes { .. }))
            .count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn fetch(
        &self,
        path: &str,
        params: &QueryParams,
    ) -> Result<serde_json::Value, ApiError> {
        lock(&self.calls).push(RecordedCall::Fetch {
            path: path.to_string(),
            params: params.clone(),
        });
        lock(&self.json)
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network(format!("no scripted response for {}", path))))
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        lock(&self.calls).push(RecordedCall::Bytes {
            url: url.to_string(),
        });
        lock(&self.bytes)
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network(format!("no scripted bytes for {}", url))))
    }
}

/// Helper to build a photo record as the API would send it.
pub fn photo_json(id: &str) -> serde_json::Value {
    let urls = sample_urls(id);
    serde_json::json!({
        "id": id,
        "width": 4000,
        "height": 3000,
        "likes": 7,
        "description": format!("photo {}", id),
        "urls": urls,
    })
}

/// Helper to build a search page body with `count` photos named `<prefix>-<n>`.
pub fn search_page_json(
    prefix: &str,
    start: usize,
    count: usize,
    total: usize,
    total_pages: u32,
) -> serde_json::Value {
    let results: Vec<_> = (start..start + count)
        .map(|n| photo_json(&format!("{}-{}", prefix, n)))
        .collect();
    serde_json::json!({
        "total": total,
        "total_pages": total_pages,
        "results": results,
    })
}

/// Helper to build the download URLs of a photo.
pub fn sample_urls(id: &str) -> PhotoUrls {
    let url = |variant: &str| format!("https://images.example.com/{}?fmt={}", id, variant);
    PhotoUrls {
        raw: url("raw"),
        full: url("full"),
        regular: url("regular"),
        small: url("small"),
        thumb: url("thumb"),
    }
}
