use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Browser-like identification used for page and robots.txt requests
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Main configuration structure for Sitescribe
///
/// Every section is optional in the TOML file; missing values fall back to
/// the defaults below and may be overridden from the command line.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub politeness: PolitenessConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawl scope configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrawlConfig {
    /// Seed URL; its host bounds the crawl
    #[serde(rename = "seed-url", default)]
    pub seed_url: String,

    /// Maximum number of pages to attempt (unlimited when absent)
    #[serde(rename = "max-pages", default)]
    pub max_pages: Option<u32>,
}

/// Request pacing and robots.txt configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PolitenessConfig {
    /// Lower bound of the random delay before each request (seconds)
    #[serde(rename = "min-delay", default = "default_min_delay")]
    pub min_delay: f64,

    /// Upper bound of the random delay before each request (seconds)
    #[serde(rename = "max-delay", default = "default_max_delay")]
    pub max_delay: f64,

    /// Whether robots.txt directives are honored
    #[serde(rename = "respect-robots", default = "default_true")]
    pub respect_robots: bool,
}

impl Default for PolitenessConfig {
    fn default() -> Self {
        Self {
            min_delay: default_min_delay(),
            max_delay: default_max_delay(),
            respect_robots: true,
        }
    }
}

/// Static fetch and rendering configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Timeout for a single static request (seconds)
    #[serde(rename = "timeout", default = "default_timeout")]
    pub timeout_secs: u64,

    /// Whether the headless browser fallback may be used
    #[serde(rename = "render", default = "default_true")]
    pub render: bool,

    /// How long a rendered page is left to settle before reading its DOM (milliseconds)
    #[serde(rename = "render-settle", default = "default_render_settle")]
    pub render_settle_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout(),
            render: true,
            render_settle_ms: default_render_settle(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the CSV file receiving one row per page
    #[serde(rename = "path", default = "default_output_path")]
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

fn default_min_delay() -> f64 {
    1.0
}

fn default_max_delay() -> f64 {
    3.0
}

fn default_true() -> bool {
    true
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_render_settle() -> u64 {
    3000
}

fn default_output_path() -> String {
    "scraped_data.csv".to_string()
}

/// Inclusive range the politeness delay is drawn from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayRange {
    pub min: Duration,
    pub max: Duration,
}

impl DelayRange {
    /// Builds a range from seconds; callers validate `min <= max` beforehand
    ///
    /// Values that do not fit a `Duration` saturate instead of panicking.
    pub fn from_secs(min: f64, max: f64) -> Self {
        Self {
            min: secs_to_duration(min),
            max: secs_to_duration(max),
        }
    }

    /// A range that never sleeps
    pub fn zero() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    /// Raises both bounds so that no delay is shorter than `floor`
    pub fn with_floor(self, floor: Duration) -> Self {
        Self {
            min: self.min.max(floor),
            max: self.max.max(floor),
        }
    }
}

fn secs_to_duration(secs: f64) -> Duration {
    match Duration::try_from_secs_f64(secs) {
        Ok(duration) => duration,
        Err(_) if secs > 0.0 => Duration::MAX,
        Err(_) => Duration::ZERO,
    }
}

/// Immutable per-run policy derived from a validated [`Config`]
#[derive(Debug, Clone)]
pub struct PolicyConfig {
    /// Seed URL; the crawl never leaves its host
    pub base_url: Url,
    pub delay: DelayRange,
    pub respect_robots: bool,
    pub user_agent: String,
}
