//! Crawl frontier
//!
//! A FIFO queue of pending URLs paired with a seen-set, giving breadth-first
//! traversal with O(1) deduplication:
//! - a URL is pending at most once
//! - a URL that has been pending or visited is never enqueued again
//! - `mark_visited` records the URLs actually taken for fetching

use std::collections::{HashSet, VecDeque};
use url::Url;

/// Pending URLs plus everything ever enqueued or visited
#[derive(Debug, Default)]
pub struct Frontier {
    /// URLs waiting to be fetched, oldest first
    pending: VecDeque<Url>,

    /// Every URL that has been pending or visited
    seen: HashSet<Url>,

    /// URLs that were taken for fetching
    visited: HashSet<Url>,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a URL to the back of the queue
    ///
    /// # Returns
    ///
    /// * `true` - The URL was new and is now pending
    /// * `false` - The URL is already pending or was visited; nothing changed
    pub fn enqueue(&mut self, url: Url) -> bool {
        if self.visited.contains(&url) || !self.seen.insert(url.clone()) {
            tracing::trace!("Frontier already knows {}", url);
            return false;
        }

        self.pending.push_back(url);
        true
    }

    /// Removes and returns the earliest-enqueued URL
    pub fn dequeue(&mut self) -> Option<Url> {
        self.pending.pop_front()
    }

    /// Records that `url` is about to be fetched
    ///
    /// Returns false if it had already been marked.
    pub fn mark_visited(&mut self, url: &Url) -> bool {
        self.seen.insert(url.clone());
        self.visited.insert(url.clone())
    }

    /// Returns true if `url` was taken for fetching
    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url)
    }

    /// Returns true if nothing is pending
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of pending URLs
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Number of visited URLs
    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }
}
