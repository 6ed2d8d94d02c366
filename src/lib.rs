//! Sitescribe: an adaptive single-site content crawler
//!
//! This crate starts from one seed URL, visits pages on the same host in
//! breadth-first order, and records the readable text of every page. Pages that
//! look like client-rendered shells are re-fetched through a headless browser,
//! which is launched at most once per run.

pub mod config;
pub mod crawler;
pub mod output;
pub mod render;
pub mod robots;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Sitescribe operations
#[derive(Debug, Error)]
pub enum ScribeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Network or timeout failure on a static fetch
    #[error("Transport error for {url}: {source}")]
    Transport { url: String, source: reqwest::Error },

    /// Server answered with something other than 200
    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    /// The robots.txt document could not be retrieved
    #[error("Robots policy unavailable at {url}: {message}")]
    PolicyUnavailable { url: String, message: String },

    /// The rendering engine failed to start
    #[error("Rendering engine failed to initialize: {0}")]
    RenderInit(String),

    /// The rendering engine failed on a single page
    #[error("Rendering failed for {url}: {message}")]
    RenderNavigation { url: String, message: String },

    #[error("Rendering engine failed to shut down: {0}")]
    RenderShutdown(String),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

impl ScribeError {
    /// Returns true for failures that should send a page to the rendering fallback
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
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

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Sitescribe operations
pub type Result<T> = std::result::Result<T, ScribeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{Config, PolicyConfig};
pub use crawler::{run_crawl, Coordinator};
pub use state::{CrawlState, PageOutcome};
pub use crate::url::{is_same_host, normalize_url};
