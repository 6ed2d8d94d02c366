//! Fetch strategy selection
//!
//! Every page goes through the same state machine:
//!
//! | State | Event | Next |
//! |-------|-------|------|
//! | Primary | HTTP 200, heuristic says static | Done (static markup) |
//! | Primary | HTTP 200, heuristic says rendering | RenderAttempt (static kept as fallback) |
//! | Primary | any other status | Failed, no fallback |
//! | Primary | transport error | RenderAttempt (no fallback) |
//! | RenderAttempt | engine unavailable | fallback or Failed |
//! | RenderAttempt | render ok | Done (rendered markup) |
//! | RenderAttempt | render error | fallback or Failed |
//!
//! The engine is launched lazily and at most once per run. A failed launch
//! disables rendering for the remainder of the run. Falling back to the
//! browser on transport errors is a heuristic; a network failure is not
//! necessarily a rendering problem.

use crate::crawler::classifier::requires_rendering;
use crate::render::{RenderEngine, RenderLauncher};
use crate::state::{PageOutcome, RenderFlags};
use crate::ScribeError;
use reqwest::{redirect::Policy, Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Markup obtained for one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub markup: String,
    pub outcome: PageOutcome,
}

/// Result of one fetch through the selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// Markup is available
    Page(FetchedPage),

    /// Nothing usable; the page is skipped
    Failed(PageOutcome),
}

impl FetchResult {
    /// Returns the outcome regardless of success
    pub fn outcome(&self) -> PageOutcome {
        match self {
            Self::Page(page) => page.outcome,
            Self::Failed(outcome) => *outcome,
        }
    }

    /// Consumes the result, returning the markup if any
    pub fn into_markup(self) -> Option<String> {
        match self {
            Self::Page(page) => Some(page.markup),
            Self::Failed(_) => None,
        }
    }
}

/// Builds the HTTP client used for robots.txt and static page fetches
///
/// # Arguments
///
/// * `user_agent` - Sent with every request
/// * `timeout` - Upper bound for a whole request
pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Issues a static GET and returns the body of a 200 response
///
/// # Returns
///
/// * `Ok(String)` - Body of an HTTP 200 response
/// * `Err(ScribeError::HttpStatus)` - Any other status
/// * `Err(ScribeError::Transport)` - Connection, timeout, or body read failure
pub async fn fetch_static(client: &Client, url: &Url) -> Result<String, ScribeError> {
    let transport = |source: reqwest::Error| ScribeError::Transport {
        url: url.to_string(),
        source,
    };

    let response = client.get(url.clone()).send().await.map_err(transport)?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(ScribeError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(transport)
}

/// Chooses between static markup and the rendering engine for each page
pub struct FetchSelector {
    client: Client,
    launcher: Box<dyn RenderLauncher>,
    engine: Option<Box<dyn RenderEngine>>,
    user_agent: String,
    settle: Duration,
}

impl FetchSelector {
    /// Creates a selector; no engine is launched until a page needs one
    pub fn new(
        client: Client,
        launcher: Box<dyn RenderLauncher>,
        user_agent: impl Into<String>,
        settle: Duration,
    ) -> Self {
        Self {
            client,
            launcher,
            engine: None,
            user_agent: user_agent.into(),
            settle,
        }
    }

    /// Fetches one page, falling back to the rendering engine when needed
    ///
    /// `flags` records the run-wide launch state and is updated in place.
    pub async fn fetch(&mut self, url: &Url, flags: &mut RenderFlags) -> FetchResult {
        match fetch_static(&self.client, url).await {
            Ok(markup) => {
                if !requires_rendering(&markup) {
                    return FetchResult::Page(FetchedPage {
                        markup,
                        outcome: PageOutcome::SavedStatic,
                    });
                }
                tracing::info!("Detected JavaScript-heavy content at {}, trying rendering", url);
                self.render_attempt(url, Some(markup), flags).await
            }
            Err(e) if e.is_transport() => {
                tracing::error!("Request error for {}: {}", url, e);
                self.render_attempt(url, None, flags).await
            }
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}", url, e);
                FetchResult::Failed(PageOutcome::HttpError)
            }
        }
    }

    async fn render_attempt(
        &mut self,
        url: &Url,
        fallback: Option<String>,
        flags: &mut RenderFlags,
    ) -> FetchResult {
        let settle = self.settle;

        let Some(engine) = self.ensure_engine(flags).await else {
            return match fallback {
                Some(markup) => {
                    tracing::warn!("Rendering unavailable, using static content for {}", url);
                    FetchResult::Page(FetchedPage {
                        markup,
                        outcome: PageOutcome::SavedStaticFallback,
                    })
                }
                None => FetchResult::Failed(PageOutcome::Unreachable),
            };
        };

        match engine.render(url.as_str(), settle).await {
            Ok(markup) => FetchResult::Page(FetchedPage {
                markup,
                outcome: PageOutcome::SavedRendered,
            }),
            Err(e) => {
                tracing::error!("Rendering error for {}: {}", url, e);
                match fallback {
                    Some(markup) => FetchResult::Page(FetchedPage {
                        markup,
                        outcome: PageOutcome::SavedStaticFallback,
                    }),
                    None => FetchResult::Failed(PageOutcome::Unreachable),
                }
            }
        }
    }

    /// Returns the engine, launching it on first use
    ///
    /// Returns None once a launch has failed in this run.
    async fn ensure_engine(
        &mut self,
        flags: &mut RenderFlags,
    ) -> Option<&mut Box<dyn RenderEngine>> {
        if self.engine.is_none() {
            if flags.attempted {
                tracing::debug!("Rendering engine unavailable for this run");
                return None;
            }

            flags.attempted = true;
            match self.launcher.launch(&self.user_agent).await {
                Ok(engine) => {
                    tracing::info!("Rendering engine initialized");
                    flags.initialized = true;
                    self.engine = Some(engine);
                }
                Err(e) => {
                    tracing::error!("Error initializing rendering engine: {}", e);
                    return None;
                }
            }
        }

        self.engine.as_mut()
    }

    /// Releases the rendering engine if one was started
    ///
    /// Safe to call more than once; only the first call reaches the engine.
    pub async fn shutdown(&mut self) {
        if let Some(mut engine) = self.engine.take() {
            match engine.close().await {
                Ok(()) => tracing::info!("Rendering engine closed"),
                Err(e) => tracing::warn!("{}", e),
            }
        }
    }
}
