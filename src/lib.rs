//! # Unsplash CLI
//!
//! A command-line client for the Unsplash photo API: fetch random photos or
//! search by keyword across result pages, print a summary and optionally
//! download every photo as PNG.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`client`]: the [`Transport`](client::Transport) trait, its HTTP
//!   implementation and authentication strategies
//! - [`pagination`]: aggregation of search results across pages
//! - [`commands`]: request kinds, command dispatch and the download step
//! - [`models`]: photo records and request/response types
//! - [`config`]: layered configuration (file, environment)
//! - [`ui`]: terminal rendering of results

pub mod client;
pub mod commands;
pub mod config;
pub mod models;
pub mod pagination;
pub mod ui;

// Re-export commonly used types
pub use client::{ApiError, HttpTransport, Transport};
pub use commands::{create_command, run_command, Command, Invocation, PostProcessing};
pub use models::Photo;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
