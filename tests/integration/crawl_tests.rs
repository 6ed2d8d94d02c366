//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! crawl cycle end-to-end, writing CSV output into a temporary directory.

use async_trait::async_trait;
use sitescribe::config::Config;
use sitescribe::crawler::Coordinator;
use sitescribe::output::{CrawlSummary, CsvSink, OutputError, OutputResult, PageSink};
use sitescribe::render::{DisabledLauncher, RenderEngine, RenderLauncher};
use sitescribe::{run_crawl, PageOutcome, ScribeError};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LONG_TEXT: &str = "This article is served as plain HTML by the server. \
    It contains enough prose to clear the empty-body threshold comfortably, \
    so no rendering engine should ever be involved for it. It keeps going \
    for a while to be sure.";

/// Creates a test configuration pointing at the mock server
fn create_test_config(seed: &str, output: &Path) -> Config {
    let mut config = Config::default();
    config.crawl.seed_url = seed.to_string();
    config.politeness.min_delay = 0.0;
    config.politeness.max_delay = 0.0;
    config.fetch.user_agent = "TestBot/1.0".to_string();
    config.fetch.timeout_secs = 5;
    config.fetch.render_settle_ms = 0;
    config.output.path = output.display().to_string();
    config
}

fn output_path(dir: &TempDir) -> PathBuf {
    dir.path().join("scraped.csv")
}

fn read_rows(path: &Path) -> Vec<(String, String)> {
    let mut reader = csv::Reader::from_path(path).expect("Failed to open output");
    let headers: Vec<String> = reader
        .headers()
        .expect("Missing header row")
        .iter()
        .map(String::from)
        .collect();
    assert_eq!(headers, vec!["URL", "Content"]);

    reader
        .records()
        .map(|record| {
            let record = record.expect("Malformed row");
            (record[0].to_string(), record[1].to_string())
        })
        .collect()
}

fn static_page(body: &str) -> String {
    format!(
        "<html><head><title>Page</title></head><body><p>{}</p>{}</body></html>",
        LONG_TEXT, body
    )
}

fn shell_page(links: &str) -> String {
    format!(
        r#"<html><body><div id="root"></div>{}<script src="/app.react.js"></script></body></html>"#,
        links
    )
}

async fn mount_page(server: &MockServer, route: &str, body: String, hits: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(hits)
        .mount(server)
        .await;
}

async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn crawl_with(
    config: &Config,
    launcher: Box<dyn RenderLauncher>,
) -> Result<CrawlSummary, ScribeError> {
    let sink = CsvSink::create(Path::new(&config.output.path))?;
    let mut coordinator = Coordinator::new(config, launcher, Box::new(sink)).await?;
    coordinator.run().await
}

async fn crawl_without_rendering(config: &Config) -> CrawlSummary {
    crawl_with(config, Box::new(DisabledLauncher::new("disabled in tests")))
        .await
        .expect("Crawl failed")
}

#[derive(Default)]
struct RenderCounters {
    launches: AtomicUsize,
    renders: AtomicUsize,
    closes: AtomicUsize,
}

/// Launcher whose engine returns canned markup linking to `/b` and `/c`
struct FakeLauncher {
    counters: Arc<RenderCounters>,
    launch_ok: bool,
}

struct FakeEngine {
    counters: Arc<RenderCounters>,
}

#[async_trait]
impl RenderLauncher for FakeLauncher {
    async fn launch(&self, _user_agent: &str) -> Result<Box<dyn RenderEngine>, ScribeError> {
        self.counters.launches.fetch_add(1, Ordering::SeqCst);
        if !self.launch_ok {
            return Err(ScribeError::RenderInit("browser binary not found".to_string()));
        }
        Ok(Box::new(FakeEngine {
            counters: self.counters.clone(),
        }))
    }
}

#[async_trait]
impl RenderEngine for FakeEngine {
    async fn render(&mut self, url: &str, _settle: Duration) -> Result<String, ScribeError> {
        self.counters.renders.fetch_add(1, Ordering::SeqCst);
        Ok(format!(
            r#"<html><body><p>Rendered {}</p><a href="/b">b</a><a href="/c">c</a></body></html>"#,
            url
        ))
    }

    async fn close(&mut self) -> Result<(), ScribeError> {
        self.counters.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn fake_launcher(launch_ok: bool) -> (Box<dyn RenderLauncher>, Arc<RenderCounters>) {
    let counters = Arc::new(RenderCounters::default());
    let launcher = FakeLauncher {
        counters: counters.clone(),
        launch_ok,
    };
    (Box::new(launcher), counters)
}

#[tokio::test]
async fn test_static_site_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        static_page(
            r##"<a href="/b">B</a>
            <a href="https://other.example/x">Elsewhere</a>
            <a href="#top">Top</a>
            <a href="mailto:team@example.com">Mail</a>"##,
        ),
        1,
    )
    .await;
    mount_page(&mock_server, "/b", static_page(""), 1).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&format!("{}/", base_url), &output_path(&dir));
    let summary = crawl_without_rendering(&config).await;

    let rows = read_rows(&output_path(&dir));
    let urls: Vec<&str> = rows.iter().map(|(url, _)| url.as_str()).collect();
    assert_eq!(urls, vec![format!("{}/", base_url), format!("{}/b", base_url)]);

    assert!(rows[0].1.starts_with("Page This article is served as plain HTML"));
    assert!(rows[0].1.ends_with("B Elsewhere Top Mail"));

    assert_eq!(summary.pages_fetched, 2);
    assert_eq!(summary.count(PageOutcome::SavedStatic), 2);
    assert!(!summary.render_initialized);
}

#[tokio::test]
async fn test_no_url_fetched_twice() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Diamond with back edges: / -> a, b; a -> c, /; b -> c; c -> a
    mount_page(&mock_server, "/", static_page(r#"<a href="/a">a</a><a href="/b">b</a>"#), 1).await;
    mount_page(&mock_server, "/a", static_page(r#"<a href="/c">c</a><a href="/">home</a>"#), 1).await;
    mount_page(&mock_server, "/b", static_page(r#"<a href="c">c</a><a href="/a#again">a</a>"#), 1).await;
    mount_page(&mock_server, "/c", static_page(r#"<a href="/a">a</a><a href="./">here</a>"#), 1).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&format!("{}/", base_url), &output_path(&dir));
    let summary = crawl_without_rendering(&config).await;

    let urls: Vec<String> = read_rows(&output_path(&dir))
        .into_iter()
        .map(|(url, _)| url)
        .collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/", base_url),
            format!("{}/a", base_url),
            format!("{}/b", base_url),
            format!("{}/c", base_url),
        ]
    );
    assert_eq!(summary.pages_fetched, 4);
}

#[tokio::test]
async fn test_max_pages_budget() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", static_page(r#"<a href="/1">1</a>"#), 1).await;
    mount_page(&mock_server, "/1", static_page(r#"<a href="/2">2</a>"#), 1).await;
    mount_page(&mock_server, "/2", static_page(""), 0).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&format!("{}/", base_url), &output_path(&dir));
    config.crawl.max_pages = Some(2);
    let summary = crawl_without_rendering(&config).await;

    assert_eq!(read_rows(&output_path(&dir)).len(), 2);
    assert_eq!(summary.pages_fetched, 2);
}

#[tokio::test]
async fn test_budget_counts_failed_pages() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        static_page(r#"<a href="/missing">gone</a><a href="/ok">ok</a>"#),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/ok", static_page(""), 0).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&format!("{}/", base_url), &output_path(&dir));
    config.crawl.max_pages = Some(2);
    let summary = crawl_without_rendering(&config).await;

    assert_eq!(read_rows(&output_path(&dir)).len(), 1);
    assert_eq!(summary.pages_fetched, 2);
    assert_eq!(summary.pages_saved, 1);
}

#[tokio::test]
async fn test_http_error_skipped_without_fallback() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        static_page(r#"<a href="/broken">broken</a><a href="/next">next</a>"#),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string(shell_page("")))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/next", static_page(""), 1).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&format!("{}/", base_url), &output_path(&dir));
    let (launcher, counters) = fake_launcher(true);
    let summary = crawl_with(&config, launcher).await.unwrap();

    let urls: Vec<String> = read_rows(&output_path(&dir))
        .into_iter()
        .map(|(url, _)| url)
        .collect();
    assert_eq!(urls, vec![format!("{}/", base_url), format!("{}/next", base_url)]);
    assert_eq!(summary.count(PageOutcome::HttpError), 1);
    assert_eq!(counters.launches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_robots_disallow_respected() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nDisallow: /private\n").await;
    mount_page(
        &mock_server,
        "/",
        static_page(r#"<a href="/private/report">secret</a><a href="/public">public</a>"#),
        1,
    )
    .await;
    mount_page(&mock_server, "/private/report", static_page(""), 0).await;
    mount_page(&mock_server, "/public", static_page(""), 1).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&format!("{}/", base_url), &output_path(&dir));
    let summary = crawl_without_rendering(&config).await;

    assert_eq!(read_rows(&output_path(&dir)).len(), 2);
    assert_eq!(summary.count(PageOutcome::RobotsDenied), 1);
    assert_eq!(summary.pages_fetched, 2);
}

#[tokio::test]
async fn test_ignore_robots() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /\n"))
        .expect(0)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/", static_page(r#"<a href="/next">next</a>"#), 1).await;
    mount_page(&mock_server, "/next", static_page(""), 1).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&format!("{}/", base_url), &output_path(&dir));
    config.politeness.respect_robots = false;
    crawl_without_rendering(&config).await;

    assert_eq!(read_rows(&output_path(&dir)).len(), 2);
}

#[tokio::test]
async fn test_robots_unavailable_fails_open() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/", static_page(r#"<a href="/private">p</a>"#), 1).await;
    mount_page(&mock_server, "/private", static_page(""), 1).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&format!("{}/", base_url), &output_path(&dir));
    let summary = crawl_without_rendering(&config).await;

    assert_eq!(read_rows(&output_path(&dir)).len(), 2);
    assert_eq!(summary.count(PageOutcome::RobotsDenied), 0);
}

#[tokio::test]
async fn test_rendering_engine_started_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    for route in ["/", "/b", "/c"] {
        mount_page(&mock_server, route, shell_page(""), 1).await;
    }

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&format!("{}/", base_url), &output_path(&dir));
    let (launcher, counters) = fake_launcher(true);
    let summary = crawl_with(&config, launcher).await.unwrap();

    let rows = read_rows(&output_path(&dir));
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].1, format!("Rendered {}/ b c", base_url));
    assert_eq!(rows[2].1, format!("Rendered {}/c b c", base_url));

    assert_eq!(counters.launches.load(Ordering::SeqCst), 1);
    assert_eq!(counters.renders.load(Ordering::SeqCst), 3);
    assert_eq!(counters.closes.load(Ordering::SeqCst), 1);
    assert_eq!(summary.count(PageOutcome::SavedRendered), 3);
    assert!(summary.render_initialized);
}

#[tokio::test]
async fn test_failed_engine_start_not_retried() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let links = r#"<a href="/b">b</a><a href="/c">c</a>"#;
    for route in ["/", "/b", "/c"] {
        mount_page(&mock_server, route, shell_page(links), 1).await;
    }

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&format!("{}/", base_url), &output_path(&dir));
    let (launcher, counters) = fake_launcher(false);
    let summary = crawl_with(&config, launcher).await.unwrap();

    let rows = read_rows(&output_path(&dir));
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|(_, content)| content == "b c"));

    assert_eq!(counters.launches.load(Ordering::SeqCst), 1);
    assert_eq!(counters.closes.load(Ordering::SeqCst), 0);
    assert_eq!(summary.count(PageOutcome::SavedStaticFallback), 3);
    assert!(!summary.render_initialized);
}

#[tokio::test]
async fn test_engine_released_when_budget_reached() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", shell_page(""), 1).await;
    mount_page(&mock_server, "/b", shell_page(""), 0).await;
    mount_page(&mock_server, "/c", shell_page(""), 0).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&format!("{}/", base_url), &output_path(&dir));
    config.crawl.max_pages = Some(1);
    let (launcher, counters) = fake_launcher(true);
    crawl_with(&config, launcher).await.unwrap();

    assert_eq!(read_rows(&output_path(&dir)).len(), 1);
    assert_eq!(counters.closes.load(Ordering::SeqCst), 1);
}

/// Sink whose writes always fail
struct FailingSink;

impl PageSink for FailingSink {
    fn write_page(&mut self, _url: &str, _content: &str) -> OutputResult<()> {
        Err(OutputError::Write("disk full".to_string()))
    }

    fn finish(&mut self) -> OutputResult<()> {
        Ok(())
    }

    fn location(&self) -> String {
        "nowhere".to_string()
    }
}

#[tokio::test]
async fn test_engine_released_when_sink_fails() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", shell_page(""), 1).await;
    mount_page(&mock_server, "/b", shell_page(""), 0).await;
    mount_page(&mock_server, "/c", shell_page(""), 0).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&format!("{}/", base_url), &output_path(&dir));
    let (launcher, counters) = fake_launcher(true);

    let mut coordinator = Coordinator::new(&config, launcher, Box::new(FailingSink))
        .await
        .unwrap();
    let result = coordinator.run().await;

    assert!(matches!(result, Err(ScribeError::Output(_))));
    assert_eq!(coordinator.state().pages_fetched, 1);
    assert_eq!(counters.launches.load(Ordering::SeqCst), 1);
    assert_eq!(counters.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unreachable_page_skipped_and_crawl_continues() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        static_page(r#"<a href="/slow">slow</a><a href="/next">next</a>"#),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(static_page(""))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/next", static_page(""), 1).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&format!("{}/", base_url), &output_path(&dir));
    config.fetch.timeout_secs = 1;
    let summary = crawl_without_rendering(&config).await;

    let urls: Vec<String> = read_rows(&output_path(&dir))
        .into_iter()
        .map(|(url, _)| url)
        .collect();
    assert_eq!(urls, vec![format!("{}/", base_url), format!("{}/next", base_url)]);
    assert_eq!(summary.count(PageOutcome::Unreachable), 1);
    assert_eq!(summary.pages_fetched, 3);
}

#[tokio::test]
async fn test_run_crawl_writes_header_when_nothing_saved() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&format!("{}/", base_url), &output_path(&dir));
    config.fetch.render = false;
    let summary = run_crawl(&config).await.unwrap();

    assert!(read_rows(&output_path(&dir)).is_empty());
    assert_eq!(summary.pages_fetched, 1);
    assert_eq!(summary.pages_saved, 0);
    assert_eq!(summary.output_location, output_path(&dir).display().to_string());
}

#[tokio::test]
async fn test_invalid_seed_rejected_before_output_created() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config("ftp://example.com/", &output_path(&dir));

    let result = run_crawl(&config).await;

    assert!(matches!(result, Err(ScribeError::Config(_))));
    assert!(!output_path(&dir).exists());
}
