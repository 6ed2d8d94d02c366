//! Output module for crawl results and summaries
//!
//! This module handles:
//! - Writing saved pages to a tabular sink
//! - Recording per-run outcome statistics

mod csv_output;
pub mod stats;
mod traits;

pub use csv_output::{CsvSink, CSV_HEADERS};
pub use stats::{print_summary, CrawlSummary};
pub use traits::{OutputError, OutputResult, PageSink};
