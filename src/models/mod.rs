//! Core data models for photos and paginated requests.

mod photo;
mod search;

pub use photo::{ImageFormat, Photo, PhotoUrls, UnknownFormat};
pub use search::{PageRequest, QueryParams, RandomPayload, SearchPage, MAX_PAGE_SIZE};
