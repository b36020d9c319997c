//! Aggregation of paginated search results.
//!
//! A keyword search asks the API for pages of at most [`MAX_PAGE_SIZE`]
//! photos. [`Paginator::search`] keeps requesting pages, appending each page's
//! results in API order, until it holds the requested number of photos or the
//! API runs out of pages. The page size is fixed for the whole search so page
//! boundaries stay consistent.
//!
//! Any failed page fails the whole search; nothing collected before the
//! failure is returned.

use std::sync::Arc;

use crate::client::{ApiError, Transport};
use crate::models::{PageRequest, Photo, QueryParams, SearchPage, MAX_PAGE_SIZE};

/// The API reported fewer matches than were requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortfall {
    pub requested: usize,
    pub found: usize,
}

/// Result of a paginated search
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Collected photos, never more than requested nor more than `total`
    pub photos: Vec<Photo>,

    /// Matches reported by the API
    pub total: usize,

    /// Pages reported by the API at the page size used
    pub total_pages: u32,

    /// Pages actually requested
    pub pages_fetched: u32,

    /// Set when the API had fewer matches than requested
    pub shortfall: Option<Shortfall>,
}

/// Drives repeated page requests over a transport
#[derive(Debug, Clone)]
pub struct Paginator {
    transport: Arc<dyn Transport>,
}

impl Paginator {
    /// Create a paginator over `transport`
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Page size used for a search aiming at `max_results` photos
    pub fn page_size(max_results: usize) -> usize {
        max_results.min(MAX_PAGE_SIZE)
    }

    async fn fetch_page(&self, request: &PageRequest) -> Result<SearchPage, ApiError> {
        tracing::debug!(
            path = %request.path,
            page = request.page,
            per_page = request.per_page,
            "fetching page"
        );
        let body = self.transport.fetch(&request.path, &request.query()).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Collect up to `max_results` photos from `path`.
    ///
    /// The first page is always requested, even for `max_results == 0`, so an
    /// invalid query is still reported.
    pub async fn search(
        &self,
        path: &str,
        base_params: &QueryParams,
        max_results: usize,
    ) -> Result<SearchOutcome, ApiError> {
        let mut request = PageRequest::first(path, base_params.clone(), max_results);

        let first = self.fetch_page(&request).await?;
        let total = first.total;
        let total_pages = first.total_pages;

        let mut target = max_results;
        let mut shortfall = None;
        if total < max_results {
            tracing::warn!(
                "Requested {} images but only {} images found",
                max_results,
                total
            );
            shortfall = Some(Shortfall {
                requested: max_results,
                found: total,
            });
            target = total;
        }

        let mut photos = first.results;
        let mut pages_fetched = 1;

        while photos.len() < target && request.page < total_pages {
            request.next_page();
            let page = self.fetch_page(&request).await?;
            pages_fetched += 1;
            photos.extend(page.results);
        }

        photos.truncate(target);

        tracing::debug!(
            collected = photos.len(),
            pages_fetched,
            total,
            "search complete"
        );

        Ok(SearchOutcome {
            photos,
            total,
            total_pages,
            pages_fetched,
            shortfall,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::search_page_json;
    use crate::client::MockTransport;

    fn cats() -> QueryParams {
        let mut params = QueryParams::new();
        params.insert("query".to_string(), "cats".to_string());
        params
    }

    fn setup() -> (Arc<MockTransport>, Paginator) {
        let mock = Arc::new(MockTransport::new());
        let paginator = Paginator::new(mock.clone());
        (mock, paginator)
    }

    #[tokio::test]
    async fn test_stops_once_target_reached() {
        let (mock, paginator) = setup();
        mock.push_json(search_page_json("p", 0, 30, 200, 7))
            .push_json(search_page_json("p", 30, 30, 200, 7))
            .push_json(search_page_json("p", 60, 30, 200, 7));

        let outcome = paginator.search("search/photos", &cats(), 45).await.unwrap();

        assert_eq!(outcome.photos.len(), 45);
        assert_eq!(outcome.pages_fetched, 2);
        assert_eq!(mock.fetch_count(), 2);
        assert!(outcome.shortfall.is_none());
        assert_eq!(outcome.photos[0].id, "p-0");
        assert_eq!(outcome.photos[44].id, "p-44");
    }

    #[tokio::test]
    async fn test_page_size_constant_across_pages() {
        let (mock, paginator) = setup();
        mock.push_json(search_page_json("p", 0, 30, 200, 7))
            .push_json(search_page_json("p", 30, 30, 200, 7));

        paginator.search("search/photos", &cats(), 45).await.unwrap();

        let params = mock.fetched_params();
        assert_eq!(params.len(), 2);
        for (i, p) in params.iter().enumerate() {
            assert_eq!(p.get("per_page").map(String::as_str), Some("30"));
            assert_eq!(p.get("page"), Some(&(i + 1).to_string()));
            assert_eq!(p.get("query").map(String::as_str), Some("cats"));
        }
    }

    #[tokio::test]
    async fn test_small_request_uses_small_page() {
        let (mock, paginator) = setup();
        mock.push_json(search_page_json("p", 0, 12, 200, 17));

        let outcome = paginator.search("search/photos", &cats(), 12).await.unwrap();

        assert_eq!(outcome.photos.len(), 12);
        assert_eq!(mock.fetch_count(), 1);
        assert_eq!(
            mock.fetched_params()[0].get("per_page").map(String::as_str),
            Some("12")
        );
    }

    #[tokio::test]
    async fn test_fewer_results_than_requested() {
        let (mock, paginator) = setup();
        mock.push_json(search_page_json("p", 0, 3, 3, 1));

        let outcome = paginator.search("search/photos", &cats(), 10).await.unwrap();

        assert_eq!(outcome.photos.len(), 3);
        assert_eq!(mock.fetch_count(), 1);
        assert_eq!(
            outcome.shortfall,
            Some(Shortfall {
                requested: 10,
                found: 3
            })
        );
    }

    #[tokio::test]
    async fn test_total_exhausted_across_pages() {
        let (mock, paginator) = setup();
        mock.push_json(search_page_json("p", 0, 30, 40, 2))
            .push_json(search_page_json("p", 30, 10, 40, 2));

        let outcome = paginator.search("search/photos", &cats(), 100).await.unwrap();

        assert_eq!(outcome.photos.len(), 40);
        assert_eq!(outcome.pages_fetched, 2);
        assert_eq!(outcome.shortfall.map(|s| s.found), Some(40));
    }

    #[tokio::test]
    async fn test_stops_when_pages_run_out() {
        // API claims more matches than its pages actually hold
        let (mock, paginator) = setup();
        mock.push_json(search_page_json("p", 0, 30, 100, 2))
            .push_json(search_page_json("p", 30, 5, 100, 2));

        let outcome = paginator.search("search/photos", &cats(), 100).await.unwrap();

        assert_eq!(outcome.photos.len(), 35);
        assert_eq!(mock.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_zero_total() {
        let (mock, paginator) = setup();
        mock.push_json(search_page_json("p", 0, 0, 0, 0));

        let outcome = paginator.search("search/photos", &cats(), 10).await.unwrap();

        assert!(outcome.photos.is_empty());
        assert_eq!(mock.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_zero_requested_still_checks_first_page() {
        let (mock, paginator) = setup();
        mock.push_json(search_page_json("p", 0, 10, 200, 20));

        let outcome = paginator.search("search/photos", &cats(), 0).await.unwrap();

        assert!(outcome.photos.is_empty());
        assert_eq!(mock.fetch_count(), 1);
        assert!(outcome.shortfall.is_none());
    }

    #[tokio::test]
    async fn test_first_page_failure() {
        let (mock, paginator) = setup();
        mock.push_error(ApiError::Api {
            status: 401,
            errors: vec!["OAuth error: The access token is invalid".to_string()],
        });

        let err = paginator
            .search("search/photos", &cats(), 45)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(401));
    }

    #[tokio::test]
    async fn test_later_page_failure_discards_results() {
        let (mock, paginator) = setup();
        mock.push_json(search_page_json("p", 0, 30, 200, 7))
            .push_error(ApiError::Status(500));

        let result = paginator.search("search/photos", &cats(), 45).await;

        assert!(matches!(result, Err(ApiError::Status(500))));
        assert_eq!(mock.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_malformed_page_is_decode_error() {
        let (mock, paginator) = setup();
        mock.push_json(serde_json::json!({ "results": [] }));

        let result = paginator.search("search/photos", &cats(), 5).await;
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_page_size() {
        assert_eq!(Paginator::page_size(100), 30);
        assert_eq!(Paginator::page_size(30), 30);
        assert_eq!(Paginator::page_size(7), 7);
    }
}
