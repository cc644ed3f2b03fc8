//! Tidewalk: a bounded, multi-threaded same-domain web crawler
//!
//! This crate implements a crawler that starts from a single seed URL, fetches
//! every reachable page on the seed's domain with a fixed pool of worker
//! threads, and stops on its own once the frontier is drained and no worker
//! is mid-fetch.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Tidewalk operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("No worker could be started ({failed} of {configured} failed to initialize)")]
    NoWorkers { configured: usize, failed: usize },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("URL has no scheme/authority separator: {0}")]
    MissingAuthority(String),
}

/// Errors reported by a [`crawler::Fetcher`]
///
/// None of these are fatal to a crawl: the worker logs them and moves on.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Fetcher initialization failed: {0}")]
    Init(String),

    #[error("Request failed for {url}: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Failed to read body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },
}

/// Errors reported by a [`crawler::LinkExtractor`]
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Malformed document: {reason}")]
    Malformed { reason: String },
}

/// Result type alias for Tidewalk operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlEngine, CrawlReport};
pub use state::PageOutcome;
pub use crate::url::{resolve, DomainScope, ScopeMode};
