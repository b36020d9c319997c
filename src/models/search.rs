//! Search request and response models.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::Photo;

/// Largest `per_page` value the API accepts
pub const MAX_PAGE_SIZE: usize = 30;

/// Query parameters of a request, ordered by name
pub type QueryParams = BTreeMap<String, String>;

/// One page of a paginated request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Endpoint path relative to the API root (e.g. `search/photos`)
    pub path: String,

    /// Parameters shared by every page of the request
    pub params: QueryParams,

    /// 1-based page number
    pub page: u32,

    /// Items per page, never above [`MAX_PAGE_SIZE`]
    pub per_page: usize,
}

impl PageRequest {
    /// Create the first page of a request aiming for `max_results` items
    pub fn first(path: impl Into<String>, params: QueryParams, max_results: usize) -> Self {
        Self {
            path: path.into(),
            params,
            page: 1,
            per_page: max_results.min(MAX_PAGE_SIZE),
        }
    }

    /// Advance to the following page
    pub fn next_page(&mut self) {
        self.page += 1;
    }

    /// Full parameter set sent for the current page
    pub fn query(&self) -> QueryParams {
        let mut params = self.params.clone();
        params.insert("page".to_string(), self.page.to_string());
        params.insert("per_page".to_string(), self.per_page.to_string());
        params
    }
}

/// Body of a search endpoint response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPage {
    /// Number of matches the API reports for the whole query
    pub total: usize,

    /// Number of pages available at the requested page size
    pub total_pages: u32,

    /// Items on this page, in API order
    #[serde(default)]
    pub results: Vec<Photo>,
}

/// Body of the random photo endpoint: one photo, or an array when `count` is set
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RandomPayload {
    Many(Vec<Photo>),
    One(Box<Photo>),
}

impl RandomPayload {
    /// Flatten the payload into a list, keeping API order
    pub fn into_photos(self) -> Vec<Photo> {
        match self {
            RandomPayload::Many(photos) => photos,
            RandomPayload::One(photo) => vec![*photo],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo_json(id: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "urls": {
                "raw": "r", "full": "f", "regular": "g", "small": "s", "thumb": "t"
            }
        })
    }

    #[test]
    fn test_page_request_caps_page_size() {
        let req = PageRequest::first("search/photos", QueryParams::new(), 100);
        assert_eq!(req.per_page, 30);

        let req = PageRequest::first("search/photos", QueryParams::new(), 12);
        assert_eq!(req.per_page, 12);
    }

    #[test]
    fn test_page_request_query() {
        let mut params = QueryParams::new();
        params.insert("query".to_string(), "cats".to_string());
        let mut req = PageRequest::first("search/photos", params, 45);
        req.next_page();

        let query = req.query();
        assert_eq!(query.get("query").map(String::as_str), Some("cats"));
        assert_eq!(query.get("page").map(String::as_str), Some("2"));
        assert_eq!(query.get("per_page").map(String::as_str), Some("30"));
        // shared params are not modified
        assert!(!req.params.contains_key("page"));
    }

    #[test]
    fn test_search_page_deserialize() {
        let body = serde_json::json!({
            "total": 133,
            "total_pages": 7,
            "results": [photo_json("a"), photo_json("b")]
        });
        let page: SearchPage = serde_json::from_value(body).unwrap();
        assert_eq!(page.total, 133);
        assert_eq!(page.total_pages, 7);
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[1].id, "b");
    }

    #[test]
    fn test_random_payload_single_and_array() {
        let one: RandomPayload = serde_json::from_value(photo_json("x")).unwrap();
        assert_eq!(one.into_photos().len(), 1);

        let many: RandomPayload =
            serde_json::from_value(serde_json::json!([photo_json("x"), photo_json("y")])).unwrap();
        let photos = many.into_photos();
        assert_eq!(photos.len(), 2);
        assert_eq!(photos[0].id, "x");
    }
}
