//! Politeness controller
//!
//! Owns the robots.txt policy for the seed's origin and the randomized delay
//! taken before every page fetch. The policy is loaded once, at startup.

use crate::config::{DelayRange, PolicyConfig};
use crate::robots::{fetch_robots, ParsedRobots};
use rand::Rng;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Robots compliance and request pacing for one run
#[derive(Debug, Clone)]
pub struct Politeness {
    /// None when robots is ignored or could not be loaded
    robots: Option<ParsedRobots>,
    delay: DelayRange,
    user_agent: String,
}

impl Politeness {
    /// Loads the robots policy for the seed's origin
    ///
    /// When robots compliance is disabled nothing is fetched. A missing or
    /// unreachable robots.txt is logged and treated as allow-all for the
    /// remainder of the run. A `Crawl-delay` for our agent raises the delay
    /// range so no pause is shorter than it.
    pub async fn initialize(client: &Client, policy: &PolicyConfig) -> Self {
        if !policy.respect_robots {
            tracing::info!("Ignoring robots.txt");
            return Self::new(None, policy.delay, &policy.user_agent);
        }

        match fetch_robots(client, &policy.base_url).await {
            Ok(robots) => {
                tracing::info!("Loaded robots.txt for {}", policy.base_url);
                Self::new(Some(robots), policy.delay, &policy.user_agent)
            }
            Err(e) => {
                tracing::warn!("Could not load robots.txt, allowing all URLs: {}", e);
                Self::new(None, policy.delay, &policy.user_agent)
            }
        }
    }

    /// Builds a controller from an already-loaded policy
    pub fn new(robots: Option<ParsedRobots>, delay: DelayRange, user_agent: &str) -> Self {
        let delay = match robots.as_ref().and_then(|r| r.crawl_delay(user_agent)) {
            Some(floor) if floor > delay.min => {
                tracing::info!("Honoring Crawl-delay of {:?}", floor);
                delay.with_floor(floor)
            }
            _ => delay,
        };

        Self {
            robots,
            delay,
            user_agent: user_agent.to_string(),
        }
    }

    /// Returns whether robots.txt permits fetching `url` with our agent
    pub fn can_fetch(&self, url: &Url) -> bool {
        match &self.robots {
            Some(robots) => robots.is_allowed(url, &self.user_agent),
            None => true,
        }
    }

    /// Range the pre-fetch delay is drawn from, after any Crawl-delay floor
    pub fn delay_range(&self) -> DelayRange {
        self.delay
    }

    /// Draws a delay uniformly from the configured range
    pub fn next_delay(&self) -> Duration {
        let DelayRange { min, max } = self.delay;
        if max <= min {
            return min;
        }
        let secs = rand::thread_rng().gen_range(min.as_secs_f64()..=max.as_secs_f64());
        Duration::from_secs_f64(secs)
    }

    /// Sleeps for a freshly drawn delay
    pub async fn wait(&self) {
        let delay = self.next_delay();
        if delay.is_zero() {
            return;
        }
        tracing::debug!("Waiting {:.2}s before next request", delay.as_secs_f64());
        tokio::time::sleep(delay).await;
    }
}
