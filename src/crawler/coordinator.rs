//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that ties the components together:
//! - Pulling URLs from the frontier in breadth-first order
//! - Gating them through robots.txt and the politeness delay
//! - Fetching through the fetch selector
//! - Extracting text for the sink and links for the frontier
//!
//! The loop is strictly sequential. The rendering engine is released exactly
//! once when the loop ends, whatever the reason.

use crate::config::{build_policy, Config, PolicyConfig};
use crate::crawler::extractor::parse_page;
use crate::crawler::fetcher::{build_http_client, FetchSelector};
use crate::crawler::politeness::Politeness;
use crate::output::{CrawlSummary, CsvSink, PageSink};
use crate::render::{default_launcher, RenderLauncher};
use crate::state::{CrawlState, PageOutcome};
use crate::url::normalize_absolute;
use crate::Result;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Main crawler coordinator structure
pub struct Coordinator {
    policy: PolicyConfig,
    max_pages: Option<u32>,
    politeness: Politeness,
    selector: FetchSelector,
    state: CrawlState,
    sink: Box<dyn PageSink>,
    summary: CrawlSummary,
}

impl Coordinator {
    /// Creates a coordinator ready to run
    ///
    /// Validates the configuration, builds the HTTP client and loads the
    /// robots policy. The rendering engine is not started here.
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `launcher` - Starts the rendering engine when a page first needs it
    /// * `sink` - Receives one row per saved page
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(ScribeError)` - Invalid configuration or HTTP client setup failure
    pub async fn new(
        config: &Config,
        launcher: Box<dyn RenderLauncher>,
        sink: Box<dyn PageSink>,
    ) -> Result<Self> {
        let policy = build_policy(config)?;
        let seed = normalize_absolute(policy.base_url.as_str())?;

        let client = build_http_client(
            &policy.user_agent,
            Duration::from_secs(config.fetch.timeout_secs),
        )?;

        let politeness = Politeness::initialize(&client, &policy).await;

        let selector = FetchSelector::new(
            client,
            launcher,
            policy.user_agent.clone(),
            Duration::from_millis(config.fetch.render_settle_ms),
        );

        let summary = CrawlSummary::start(sink.location());

        Ok(Self {
            policy,
            max_pages: config.crawl.max_pages,
            politeness,
            selector,
            state: CrawlState::new(seed),
            sink,
            summary,
        })
    }

    /// Runs the crawl to completion
    ///
    /// Individual page failures are logged and skipped. Only a sink failure
    /// stops the loop early; the rendering engine is shut down either way.
    pub async fn run(&mut self) -> Result<CrawlSummary> {
        tracing::info!("Starting crawl at {}", self.policy.base_url);

        let crawled = self.crawl_loop().await;

        self.selector.shutdown().await;
        let flushed = self.sink.finish();

        self.summary.pages_fetched = self.state.pages_fetched;
        self.summary.render_initialized = self.state.render.initialized;
        self.summary.finish();

        tracing::info!(
            "Crawl completed: {} pages fetched, {} saved to {}",
            self.summary.pages_fetched,
            self.summary.pages_saved,
            self.summary.output_location
        );

        crawled?;
        flushed?;
        Ok(self.summary.clone())
    }

    async fn crawl_loop(&mut self) -> Result<()> {
        loop {
            if self.state.budget_exhausted(self.max_pages) {
                tracing::info!(
                    "Reached page budget of {}",
                    self.max_pages.unwrap_or_default()
                );
                break;
            }

            let Some(url) = self.state.frontier.dequeue() else {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            };

            if self.state.frontier.is_visited(&url) {
                tracing::debug!("Skipping already visited {}", url);
                continue;
            }

            if !self.politeness.can_fetch(&url) {
                tracing::info!("URL {} disallowed by robots.txt", url);
                self.summary.record(PageOutcome::RobotsDenied);
                continue;
            }

            self.state.frontier.mark_visited(&url);
            self.politeness.wait().await;

            tracing::info!("Fetching {}", url);
            let result = self.selector.fetch(&url, &mut self.state.render).await;
            self.state.pages_fetched += 1;
            self.summary.record(result.outcome());

            if let Some(markup) = result.into_markup() {
                self.process_page(&url, &markup)?;
            }

            tracing::info!(
                "Progress: {} pages fetched, {} in frontier",
                self.state.pages_fetched,
                self.state.frontier.pending_len()
            );
        }

        Ok(())
    }

    /// Saves the page's text and queues its same-host links
    fn process_page(&mut self, url: &Url, markup: &str) -> Result<()> {
        let parsed = parse_page(markup, url, &self.policy.base_url);

        self.sink.write_page(url.as_str(), &parsed.text)?;

        let found = parsed.links.len();
        let queued = parsed
            .links
            .into_iter()
            .filter(|link| self.state.frontier.enqueue(link.clone()))
            .count();

        tracing::debug!("{}: {} links found, {} newly queued", url, found, queued);
        Ok(())
    }

    /// Read-only view of the run's state
    pub fn state(&self) -> &CrawlState {
        &self.state
    }
}

/// Runs a complete crawl writing CSV output to the configured path
///
/// Uses the Chromium launcher unless rendering is disabled in the config or
/// the crate was built without the `browser` feature.
pub async fn run_crawl(config: &Config) -> Result<CrawlSummary> {
    build_policy(config)?;

    let sink = CsvSink::create(Path::new(&config.output.path))?;
    let launcher = default_launcher(config.fetch.render);

    let mut coordinator = Coordinator::new(config, launcher, Box::new(sink)).await?;
    coordinator.run().await
}
