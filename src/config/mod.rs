//! Configuration module for Sitescribe
//!
//! This module handles loading TOML configuration files, validating settings and
//! deriving the immutable per-run [`PolicyConfig`].
//!
//! # Example
//!
//! ```no_run
//! use sitescribe::config::{build_policy, load_config};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sitescribe.toml")).unwrap();
//! let policy = build_policy(&config).unwrap();
//! println!("Crawling host: {:?}", policy.base_url.host_str());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlConfig, DelayRange, FetchConfig, OutputConfig, PolicyConfig, PolitenessConfig,
    DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::{build_policy, validate};
