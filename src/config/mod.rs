//! Configuration management.
//!
//! Settings are layered, later layers winning:
//!
//! 1. built-in defaults
//! 2. a TOML file (`--config`, or `<config dir>/unsplash-cli/config.toml`)
//! 3. environment variables prefixed with `UNSPLASH_`
//! 4. command-line flags (applied by the binary)
//!
//! # Configuration File Format
//!
//! ```toml
//! client_id = "your-access-key"
//! api_url = "https://api.unsplash.com/"
//! timeout_secs = 30
//! download_format = "small"
//! ```
//!
//! # Environment Variables
//!
//! - `UNSPLASH_CLIENT_ID` - access key sent as `Authorization: Client-ID <key>`
//! - `UNSPLASH_API_URL` - API root (useful for pointing at a mock server)
//! - `UNSPLASH_TIMEOUT_SECS` - whole-request timeout in seconds
//! - `UNSPLASH_DOWNLOAD_FORMAT` - default download variant

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::{DEFAULT_API_URL, DEFAULT_TIMEOUT};
use crate::models::ImageFormat;

/// Prefix of the environment variables read by [`load_config`]
pub const ENV_PREFIX: &str = "UNSPLASH";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Access key of the registered application
    #[serde(default)]
    pub client_id: Option<String>,

    /// API root
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Variant downloaded when `--format` is not given
    #[serde(default = "default_download_format")]
    pub download_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client_id: None,
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
            download_format: default_download_format(),
        }
    }
}

impl Config {
    /// Request timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

fn default_download_format() -> String {
    ImageFormat::default().to_string()
}

/// Location of the per-user configuration file, if one exists
pub fn find_config_file() -> Option<PathBuf> {
    let path = dirs::config_dir()?.join("unsplash-cli").join("config.toml");
    path.is_file().then_some(path)
}

/// Load configuration from `path` (or the per-user file) and the environment
pub fn load_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    let file = path.map(Path::to_path_buf).or_else(find_config_file);
    if let Some(file) = &file {
        tracing::debug!("Using config file: {}", file.display());
    }
    build_config(file.as_deref(), environment())
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX).try_parsing(true)
}

fn build_config(
    file: Option<&Path>,
    env: config::Environment,
) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(file) = file {
        builder = builder.add_source(config::File::from(file));
    }

    builder.add_source(env).build()?.try_deserialize()
}
