//! Sink trait and errors
//!
//! A sink receives one row per saved page, in the order pages complete.

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Append-only destination for extracted page text
///
/// Implementations write their header (if any) when created, so a run that
/// saves nothing still leaves a well-formed file behind.
pub trait PageSink: Send {
    /// Appends one `(url, content)` row
    ///
    /// # Arguments
    ///
    /// * `url` - The page URL as crawled
    /// * `content` - The page's extracted text
    fn write_page(&mut self, url: &str, content: &str) -> OutputResult<()>;

    /// Flushes any buffered rows; called once when the crawl ends
    fn finish(&mut self) -> OutputResult<()>;

    /// Human-readable location of the output, for logs
    fn location(&self) -> String;
}
