//! Sitescribe main entry point
//!
//! This is the command-line interface for the Sitescribe single-site crawler.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use sitescribe::config::{build_policy, load_config_with_hash, Config};
use sitescribe::output::print_summary;
use sitescribe::run_crawl;
use tracing_subscriber::EnvFilter;

/// Sitescribe: an adaptive single-site content crawler
///
/// Sitescribe crawls every page reachable on the seed URL's host, respecting
/// robots.txt and a randomized delay between requests. Pages that look like
/// client-rendered shells are loaded in a headless browser. The readable text
/// of each page is written to a CSV file.
#[derive(Parser, Debug)]
#[command(name = "sitescribe")]
#[command(version = "1.0.0")]
#[command(about = "An adaptive single-site content crawler", long_about = None)]
struct Cli {
    /// URL to start crawling from (overrides the config file)
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output CSV file
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    /// Maximum number of pages to fetch
    #[arg(short, long)]
    max_pages: Option<u32>,

    /// Minimum delay between requests in seconds
    #[arg(long, value_name = "SECONDS")]
    delay_min: Option<f64>,

    /// Maximum delay between requests in seconds
    #[arg(long, value_name = "SECONDS")]
    delay_max: Option<f64>,

    /// Ignore robots.txt
    #[arg(long)]
    ignore_robots: bool,

    /// Never start a headless browser
    #[arg(long)]
    no_render: bool,

    /// User-agent sent with every request
    #[arg(long)]
    user_agent: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Logging verbosity
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.log_level);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    apply_overrides(&mut config, &cli);

    let policy = build_policy(&config).context("Invalid configuration")?;
    tracing::info!(
        "Crawling {} (robots: {}, delay: {:.1}-{:.1}s, rendering: {})",
        policy.base_url,
        if policy.respect_robots { "respected" } else { "ignored" },
        policy.delay.min.as_secs_f64(),
        policy.delay.max.as_secs_f64(),
        if config.fetch.render { "enabled" } else { "disabled" }
    );

    let summary = run_crawl(&config)
        .await
        .with_context(|| format!("Crawl of {} failed", policy.base_url))?;

    print_summary(&summary);

    Ok(())
}

/// Sets up the logging/tracing subscriber for the chosen level
fn setup_logging(level: LogLevel) {
    let filter = EnvFilter::new(format!("sitescribe={},warn", level.as_str()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Lets command-line flags win over values from the config file
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(url) = &cli.url {
        config.crawl.seed_url = url.clone();
    }
    if let Some(output) = &cli.output {
        config.output.path = output.clone();
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawl.max_pages = Some(max_pages);
    }
    if let Some(min) = cli.delay_min {
        config.politeness.min_delay = min;
    }
    if let Some(max) = cli.delay_max {
        config.politeness.max_delay = max;
    }
    if cli.ignore_robots {
        config.politeness.respect_robots = false;
    }
    if cli.no_render {
        config.fetch.render = false;
    }
    if let Some(user_agent) = &cli.user_agent {
        config.fetch.user_agent = user_agent.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.fetch.timeout_secs = timeout;
    }
}
