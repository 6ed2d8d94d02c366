//! Crawler module for page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - Robots compliance and request pacing
//! - Deciding when a page needs a rendering engine
//! - Static fetching with rendering fallback
//! - Text and link extraction
//! - Breadth-first frontier management
//! - Overall crawl coordination

pub mod classifier;
mod coordinator;
mod extractor;
mod fetcher;
mod frontier;
mod politeness;

pub use classifier::requires_rendering;
pub use coordinator::{run_crawl, Coordinator};
pub use extractor::{extract_links, extract_text, parse_page, ParsedPage};
pub use fetcher::{build_http_client, fetch_static, FetchResult, FetchSelector, FetchedPage};
pub use frontier::Frontier;
pub use politeness::Politeness;
