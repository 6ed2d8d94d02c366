//! Per-run crawl state
//!
//! Owned by the coordinator. The fetch selector receives `&mut RenderFlags`
//! and is the only other writer.

use crate::crawler::Frontier;

/// Run-wide record of the rendering engine's lifecycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderFlags {
    /// An engine launch has been tried in this run
    pub attempted: bool,

    /// That launch succeeded and an engine handle exists
    pub initialized: bool,
}

impl RenderFlags {
    /// Rendering will never be tried again in this run
    pub fn unavailable(&self) -> bool {
        self.attempted && !self.initialized
    }
}

/// Mutable state of one crawl run
#[derive(Debug)]
pub struct CrawlState {
    pub frontier: Frontier,

    /// Pages taken off the frontier and fetched, successful or not
    pub pages_fetched: u32,

    pub render: RenderFlags,
}

impl CrawlState {
    /// Creates the state for a run starting at `seed`
    pub fn new(seed: url::Url) -> Self {
        let mut frontier = Frontier::new();
        frontier.enqueue(seed);
        Self {
            frontier,
            pages_fetched: 0,
            render: RenderFlags::default(),
        }
    }

    /// Returns true once `max_pages` pages have been fetched
    pub fn budget_exhausted(&self, max_pages: Option<u32>) -> bool {
        max_pages.is_some_and(|max| self.pages_fetched >= max)
    }
}
