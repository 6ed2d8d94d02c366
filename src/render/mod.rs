//! Rendering engine collaborators
//!
//! The fetch selector only sees two traits:
//! - [`RenderLauncher`] starts an engine; this may fail independently of any page
//! - [`RenderEngine`] navigates to a URL, waits for scripts to settle and returns
//!   the materialized markup
//!
//! With the `browser` feature a headless Chromium backend is available.

#[cfg(feature = "browser")]
mod chromium;

#[cfg(feature = "browser")]
pub use chromium::{ChromiumEngine, ChromiumLauncher};

use crate::ScribeError;
use async_trait::async_trait;
use std::time::Duration;

/// A running rendering engine
#[async_trait]
pub trait RenderEngine: Send {
    /// Navigates to `url`, waits `settle`, and returns the current DOM as HTML
    async fn render(&mut self, url: &str, settle: Duration) -> Result<String, ScribeError>;

    /// Releases the engine; called once when the crawl ends
    async fn close(&mut self) -> Result<(), ScribeError>;
}

/// Starts rendering engines
#[async_trait]
pub trait RenderLauncher: Send + Sync {
    /// Launches an engine that identifies itself with `user_agent`
    async fn launch(&self, user_agent: &str) -> Result<Box<dyn RenderEngine>, ScribeError>;
}

/// Launcher used when rendering is turned off; every launch fails
#[derive(Debug, Clone, Default)]
pub struct DisabledLauncher {
    reason: String,
}

impl DisabledLauncher {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl RenderLauncher for DisabledLauncher {
    async fn launch(&self, _user_agent: &str) -> Result<Box<dyn RenderEngine>, ScribeError> {
        Err(ScribeError::RenderInit(self.reason.clone()))
    }
}

/// Picks the launcher for a run
///
/// Returns the Chromium launcher when `enabled` and the `browser` feature is
/// compiled in, otherwise a [`DisabledLauncher`].
pub fn default_launcher(enabled: bool) -> Box<dyn RenderLauncher> {
    if !enabled {
        return Box::new(DisabledLauncher::new("rendering disabled by configuration"));
    }
    browser_launcher()
}

#[cfg(feature = "browser")]
fn browser_launcher() -> Box<dyn RenderLauncher> {
    Box::new(ChromiumLauncher::new())
}

#[cfg(not(feature = "browser"))]
fn browser_launcher() -> Box<dyn RenderLauncher> {
    Box::new(DisabledLauncher::new("built without the `browser` feature"))
}
