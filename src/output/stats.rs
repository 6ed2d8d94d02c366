//! Run statistics
//!
//! Counts page outcomes as the crawl progresses and prints a short report
//! once it is over.

use crate::state::PageOutcome;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Summary statistics for a crawl
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Pages requested, whether or not they produced content
    pub pages_fetched: u32,

    /// Rows written to the sink
    pub pages_saved: u64,

    /// Count of pages by outcome
    pub outcomes: HashMap<PageOutcome, u64>,

    /// Whether a rendering engine was started during the run
    pub render_initialized: bool,

    /// Where the rows went
    pub output_location: String,
}

impl CrawlSummary {
    /// Starts a summary timestamped now
    pub fn start(output_location: impl Into<String>) -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            pages_fetched: 0,
            pages_saved: 0,
            outcomes: HashMap::new(),
            render_initialized: false,
            output_location: output_location.into(),
        }
    }

    /// Counts one page outcome
    pub fn record(&mut self, outcome: PageOutcome) {
        *self.outcomes.entry(outcome).or_insert(0) += 1;
        if outcome.is_saved() {
            self.pages_saved += 1;
        }
    }

    /// Returns how many pages ended with `outcome`
    pub fn count(&self, outcome: PageOutcome) -> u64 {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    /// Pages that were requested but produced nothing
    pub fn total_errors(&self) -> u64 {
        self.outcomes
            .iter()
            .filter(|(outcome, _)| outcome.is_error())
            .map(|(_, count)| count)
            .sum()
    }

    /// Stamps the finish time
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Seconds between start and finish, if finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

/// Prints a summary to stdout in a formatted manner
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Crawl Summary ===\n");

    println!("Run:");
    println!("  Started:  {}", summary.started_at.to_rfc3339());
    if let Some(finished) = summary.finished_at {
        println!("  Finished: {}", finished.to_rfc3339());
    }
    if let Some(seconds) = summary.duration_seconds() {
        println!("  Duration: {}s", seconds);
    }
    println!();

    println!("Pages:");
    println!("  Fetched: {}", summary.pages_fetched);
    println!("  Saved:   {}", summary.pages_saved);
    println!("  Errors:  {}", summary.total_errors());
    println!();

    println!("Outcomes:");
    for outcome in PageOutcome::all() {
        let count = summary.count(outcome);
        if count > 0 {
            println!("  {}: {}", outcome, count);
        }
    }
    println!();

    println!(
        "Rendering engine: {}",
        if summary.render_initialized {
            "used"
        } else {
            "not started"
        }
    );
    println!("Output: {}", summary.output_location);
}
