//! Headless Chromium backend
//!
//! Drives a local Chrome/Chromium over the DevTools protocol. The CDP event
//! handler runs on its own task for the lifetime of the browser.

use super::{RenderEngine, RenderLauncher};
use crate::ScribeError;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Launches headless Chromium instances
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromiumLauncher;

impl ChromiumLauncher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RenderLauncher for ChromiumLauncher {
    async fn launch(&self, user_agent: &str) -> Result<Box<dyn RenderEngine>, ScribeError> {
        let config = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-dev-shm-usage")
            .arg(format!("--user-agent={}", user_agent))
            .build()
            .map_err(ScribeError::RenderInit)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| ScribeError::RenderInit(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::trace!("Browser handler event error: {}", e);
                }
            }
        });

        tracing::info!("Headless browser started");

        Ok(Box::new(ChromiumEngine {
            browser,
            handler_task,
        }))
    }
}

/// A running headless Chromium
pub struct ChromiumEngine {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

#[async_trait]
impl RenderEngine for ChromiumEngine {
    async fn render(&mut self, url: &str, settle: Duration) -> Result<String, ScribeError> {
        let navigation_error = |message: String| ScribeError::RenderNavigation {
            url: url.to_string(),
            message,
        };

        let page = self
            .browser
            .new_page(url)
            .await
            .map_err(|e| navigation_error(e.to_string()))?;

        tokio::time::sleep(settle).await;

        let content = page.content().await;

        if let Err(e) = page.close().await {
            tracing::debug!("Failed to close browser tab for {}: {}", url, e);
        }

        content.map_err(|e| navigation_error(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), ScribeError> {
        let closed = self
            .browser
            .close()
            .await
            .map_err(|e| ScribeError::RenderShutdown(e.to_string()));

        if let Err(e) = self.browser.wait().await {
            tracing::debug!("Waiting for browser process failed: {}", e);
        }
        self.handler_task.abort();

        closed.map(|_| ())
    }
}
