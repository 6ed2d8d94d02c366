//! Robots.txt parser implementation
//!
//! Permission checks are delegated to the robotstxt crate; `Crawl-delay` is read
//! here since that matcher does not expose it.

use robotstxt::DefaultMatcher;
use std::time::Duration;
use url::Url;

/// Parsed robots.txt data
///
/// An instance without a body allows everything; this is what the crawl uses
/// when the document was unavailable.
#[derive(Debug, Clone, Default)]
pub struct ParsedRobots {
    body: Option<String>,
}

impl ParsedRobots {
    /// Creates a ParsedRobots from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        let body = if content.trim().is_empty() {
            None
        } else {
            Some(content.to_string())
        };
        Self { body }
    }

    /// Creates a permissive ParsedRobots that allows everything
    pub fn allow_all() -> Self {
        Self { body: None }
    }

    /// Returns true when this instance allows every URL
    pub fn is_allow_all(&self) -> bool {
        self.body.is_none()
    }

    /// Checks if a URL is allowed for the given user agent
    ///
    /// Only the product token of `user_agent` is matched against `User-agent`
    /// lines, so a browser string such as `Mozilla/5.0 (...)` falls into the
    /// `*` group unless the file names `Mozilla` explicitly.
    pub fn is_allowed(&self, url: &Url, user_agent: &str) -> bool {
        let Some(body) = &self.body else {
            return true;
        };

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(body, product_token(user_agent), url.as_str())
    }

    /// Returns the `Crawl-delay` that applies to `user_agent`
    ///
    /// A group naming the agent takes precedence over the `*` group.
    pub fn crawl_delay(&self, user_agent: &str) -> Option<Duration> {
        let body = self.body.as_deref()?;
        let token = product_token(user_agent).to_ascii_lowercase();

        let mut specific = None;
        let mut wildcard = None;
        let mut group: Vec<String> = Vec::new();
        let mut group_has_rules = false;

        for line in body.lines() {
            let line = line.split('#').next().unwrap_or("").trim();
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();

            match key.trim().to_ascii_lowercase().as_str() {
                "user-agent" => {
                    // A user-agent line after rules starts a new group
                    if group_has_rules {
                        group.clear();
                        group_has_rules = false;
                    }
                    group.push(value.to_ascii_lowercase());
                }
                "crawl-delay" => {
                    group_has_rules = true;
                    let Some(delay) = parse_delay(value) else {
                        continue;
                    };
                    if !token.is_empty() && group.iter().any(|agent| *agent == token) {
                        specific.get_or_insert(delay);
                    } else if group.iter().any(|agent| agent == "*") {
                        wildcard.get_or_insert(delay);
                    }
                }
                _ => group_has_rules = true,
            }
        }

        specific.or(wildcard)
    }
}

/// Leading `[A-Za-z_-]` run of a user-agent string, as robots matching expects
fn product_token(user_agent: &str) -> &str {
    let end = user_agent
        .find(|c: char| !(c.is_ascii_alphabetic() || c == '-' || c == '_'))
        .unwrap_or(user_agent.len());
    &user_agent[..end]
}

/// Longest `Crawl-delay` taken seriously; larger values are ignored
const MAX_CRAWL_DELAY: Duration = Duration::from_secs(24 * 60 * 60);

fn parse_delay(value: &str) -> Option<Duration> {
    let secs: f64 = value.parse().ok()?;
    let delay = Duration::try_from_secs_f64(secs).ok()?;
    (delay <= MAX_CRAWL_DELAY).then_some(delay)
}
