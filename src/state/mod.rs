//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: frontier, fetched-page counter and rendering flags for one run
//! - `RenderFlags`: whether the rendering engine was attempted and whether it started
//! - `PageOutcome`: how each visited URL ended

mod crawl_state;
mod page_outcome;

// Re-export main types
pub use crawl_state::{CrawlState, RenderFlags};
pub use page_outcome::PageOutcome;
