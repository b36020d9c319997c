//! Request kinds the client can execute.
//!
//! A CLI invocation becomes an [`Invocation`]: one [`Command`] plus an optional
//! [`PostProcessing`] step. The driver runs the command with [`run_command`]
//! and, only if that succeeded, runs the post-processing step on the photos it
//! returned.

mod dispatch;
mod download;

pub use dispatch::{
    create_command, CommandParams, DispatchError, DEFAULT_MAX_RESULTS, GET_RANDOM_PHOTO,
    SEARCH_BY_KEYWORD,
};
pub use download::{download, download_with_progress, file_name};

use std::path::PathBuf;
use std::sync::Arc;

use crate::client::{ApiError, Transport};
use crate::models::{Photo, QueryParams, RandomPayload};
use crate::pagination::Paginator;

/// Endpoint returning random photos
pub const RANDOM_PHOTO_PATH: &str = "photos/random";

/// Endpoint searching photos by keyword
pub const SEARCH_PHOTOS_PATH: &str = "search/photos";

/// A request against the API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `count` random photos in a single call
    RandomPhoto { count: u32 },

    /// Up to `max_results` photos matching `query`, collected across pages
    KeywordSearch { query: String, max_results: usize },
}

impl Command {
    /// Name of the command as typed on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Command::RandomPhoto { .. } => GET_RANDOM_PHOTO,
            Command::KeywordSearch { .. } => SEARCH_BY_KEYWORD,
        }
    }
}

/// Step run on the photos of a successful command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostProcessing {
    /// Save every photo as `<destination>/<id>.png` using the `format` variant.
    ///
    /// `format` is kept as given and validated when the step runs.
    Download { destination: PathBuf, format: String },
}

impl PostProcessing {
    /// Run the step over `photos`
    pub async fn run(
        &self,
        transport: &dyn Transport,
        photos: &[Photo],
    ) -> Result<Vec<PathBuf>, ApiError> {
        match self {
            PostProcessing::Download {
                destination,
                format,
            } => download(transport, photos, destination, format).await,
        }
    }
}

/// A command bound to its optional post-processing step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: Command,
    pub post_processing: Option<PostProcessing>,
}

/// Execute `command` and return the photos it produced.
pub async fn run_command(
    transport: &Arc<dyn Transport>,
    command: &Command,
) -> Result<Vec<Photo>, ApiError> {
    tracing::debug!(command = command.name(), "running command");

    match command {
        Command::RandomPhoto { count } => {
            let mut params = QueryParams::new();
            params.insert("count".to_string(), count.to_string());

            let body = transport.fetch(RANDOM_PHOTO_PATH, &params).await?;
            let payload: RandomPayload = serde_json::from_value(body)?;
            Ok(payload.into_photos())
        }
        Command::KeywordSearch { query, max_results } => {
            let mut params = QueryParams::new();
            params.insert("query".to_string(), query.clone());

            let outcome = Paginator::new(Arc::clone(transport))
                .search(SEARCH_PHOTOS_PATH, &params, *max_results)
                .await?;
            Ok(outcome.photos)
        }
    }
}
