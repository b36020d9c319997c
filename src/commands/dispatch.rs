//! Mapping from command names to invocations.

use std::path::PathBuf;

use super::{Command, Invocation, PostProcessing};
use crate::models::ImageFormat;

/// Name of the random photo command
pub const GET_RANDOM_PHOTO: &str = "get-random-photo";

/// Name of the keyword search command
pub const SEARCH_BY_KEYWORD: &str = "search-by-keyword";

/// Default number of search results
pub const DEFAULT_MAX_RESULTS: usize = 100;

/// Errors raised while building an invocation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("Command {0} not implemented (expected get-random-photo or search-by-keyword)")]
    UnsupportedCommand(String),

    #[error("Command {command} requires --{parameter}")]
    MissingParameter {
        command: &'static str,
        parameter: &'static str,
    },
}

/// Parameters collected from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandParams {
    /// Search keywords
    pub query: Option<String>,

    /// Maximum number of search results
    pub max_results: usize,

    /// Number of random photos
    pub count: u32,

    /// Directory to download photos into; enables the download step
    pub download_folder: Option<PathBuf>,

    /// Download variant name
    pub format: String,
}

impl Default for CommandParams {
    fn default() -> Self {
        Self {
            query: None,
            max_results: DEFAULT_MAX_RESULTS,
            count: 1,
            download_folder: None,
            format: ImageFormat::default().to_string(),
        }
    }
}

/// Build the invocation for `name`.
///
/// Unknown names are rejected before any parameter is looked at. A download
/// step is attached, not run, when a download folder was given.
pub fn create_command(name: &str, params: &CommandParams) -> Result<Invocation, DispatchError> {
    let command = match name {
        GET_RANDOM_PHOTO => Command::RandomPhoto {
            count: params.count,
        },
        SEARCH_BY_KEYWORD => {
            let query = params
                .query
                .as_deref()
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .ok_or(DispatchError::MissingParameter {
                    command: SEARCH_BY_KEYWORD,
                    parameter: "query",
                })?;
            Command::KeywordSearch {
                query: query.to_string(),
                max_results: params.max_results,
            }
        }
        other => return Err(DispatchError::UnsupportedCommand(other.to_string())),
    };

    let post_processing = params
        .download_folder
        .as_ref()
        .map(|destination| PostProcessing::Download {
            destination: destination.clone(),
            format: params.format.clone(),
        });

    Ok(Invocation {
        command,
        post_processing,
    })
}
