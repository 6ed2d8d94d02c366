//! URL handling module for Sitescribe
//!
//! This module provides URL normalization and the same-host scoping check used
//! to keep the crawl on the seed's site.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{extract_host, is_same_host};
pub use normalize::{normalize_absolute, normalize_url};
