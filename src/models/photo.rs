//! Photo model representing one record returned by the Unsplash API.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Resolution variant a photo can be downloaded as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Raw,
    Full,
    Regular,
    Small,
    Thumb,
}

impl ImageFormat {
    /// All recognized variants, largest first
    pub const ALL: [ImageFormat; 5] = [
        ImageFormat::Raw,
        ImageFormat::Full,
        ImageFormat::Regular,
        ImageFormat::Small,
        ImageFormat::Thumb,
    ];

    /// Returns the key used for this variant in the API's `urls` object
    pub fn id(&self) -> &'static str {
        match self {
            ImageFormat::Raw => "raw",
            ImageFormat::Full => "full",
            ImageFormat::Regular => "regular",
            ImageFormat::Small => "small",
            ImageFormat::Thumb => "thumb",
        }
    }
}

impl Default for ImageFormat {
    fn default() -> Self {
        ImageFormat::Small
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Error returned when a format name is not one of the five variants
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("format '{0}' not supported (expected one of raw, full, regular, small, thumb)")]
pub struct UnknownFormat(pub String);

impl FromStr for ImageFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ImageFormat::ALL
            .into_iter()
            .find(|f| f.id() == s)
            .ok_or_else(|| UnknownFormat(s.to_string()))
    }
}

/// Per-format download URLs of a photo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoUrls {
    pub raw: String,
    pub full: String,
    pub regular: String,
    pub small: String,
    pub thumb: String,
}

impl PhotoUrls {
    /// URL of the requested variant
    pub fn get(&self, format: ImageFormat) -> &str {
        match format {
            ImageFormat::Raw => &self.raw,
            ImageFormat::Full => &self.full,
            ImageFormat::Regular => &self.regular,
            ImageFormat::Small => &self.small,
            ImageFormat::Thumb => &self.thumb,
        }
    }
}

/// A photo record
///
/// Only the fields the client reads are typed. Everything else the API sends
/// (user, links, exif, ...) is kept in `extra` so the record serializes back
/// out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    /// Stable identifier, also used as the downloaded file stem
    pub id: String,

    /// Download URLs per format
    pub urls: PhotoUrls,

    /// Author supplied description
    #[serde(default)]
    pub description: Option<String>,

    /// Generated description, present on most photos without one
    #[serde(default)]
    pub alt_description: Option<String>,

    #[serde(default)]
    pub width: u32,

    #[serde(default)]
    pub height: u32,

    /// Number of likes
    #[serde(default)]
    pub likes: u64,

    /// Remaining attributes, untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Photo {
    /// Create a photo with the given id and urls
    pub fn new(id: impl Into<String>, urls: PhotoUrls) -> Self {
        Self {
            id: id.into(),
            urls,
            description: None,
            alt_description: None,
            width: 0,
            height: 0,
            likes: 0,
            extra: serde_json::Map::new(),
        }
    }

    /// Description to show to the user, falling back to the generated one
    pub fn display_description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .or(self.alt_description.as_deref())
    }

    /// Download URL for the requested format
    pub fn url_for(&self, format: ImageFormat) -> &str {
        self.urls.get(format)
    }
}
