//! Robots.txt handling module
//!
//! The robots document is fetched once per run from the seed's origin. Any
//! failure to retrieve it is reported as [`ScribeError::PolicyUnavailable`];
//! the politeness controller turns that into allow-all for the whole run.

mod parser;

pub use parser::ParsedRobots;

use crate::ScribeError;
use reqwest::Client;
use url::Url;

/// Returns `<scheme>://<host>[:port]/robots.txt` for the given URL
pub fn robots_url(base: &Url) -> Result<Url, ScribeError> {
    Ok(base.join("/robots.txt")?)
}

/// Fetches and parses robots.txt for the seed's origin
///
/// # Arguments
///
/// * `client` - HTTP client carrying the crawl's user agent
/// * `base` - The seed URL
///
/// # Returns
///
/// * `Ok(ParsedRobots)` - Successfully fetched and parsed robots.txt
/// * `Err(ScribeError::PolicyUnavailable)` - Transport failure, non-success
///   status, or unreadable body
pub async fn fetch_robots(client: &Client, base: &Url) -> Result<ParsedRobots, ScribeError> {
    let url = robots_url(base)?;
    let unavailable = |message: String| ScribeError::PolicyUnavailable {
        url: url.to_string(),
        message,
    };

    tracing::debug!("Fetching robots.txt from {}", url);

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| unavailable(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(unavailable(format!("HTTP {}", status.as_u16())));
    }

    let body = response
        .text()
        .await
        .map_err(|e| unavailable(e.to_string()))?;

    Ok(ParsedRobots::from_content(&body))
}
