//! Content extraction from page markup
//!
//! This module turns HTML into:
//! - the page's readable text, whitespace-normalized
//! - the same-host links to follow, as normalized absolute URLs

use crate::url::{is_same_host, normalize_url};
use scraper::{Html, Selector};
use url::Url;

/// Elements whose content is never part of the extracted text
const NON_CONTENT_ELEMENTS: &[&str] = &["script", "style", "noscript", "iframe", "svg", "img"];

/// Reference prefixes that never lead to a crawlable page
const SKIPPED_PREFIXES: &[&str] = &["#", "javascript:", "mailto:", "tel:"];

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// Visible text, single-space separated
    pub text: String,

    /// Same-host links in document order (may repeat)
    pub links: Vec<Url>,
}

/// Parses markup once and extracts both text and links
///
/// # Arguments
///
/// * `markup` - The page's HTML
/// * `page_url` - URL the markup was fetched from; relative links resolve against it
/// * `base_url` - The crawl's seed URL; only links on its host are kept
///
/// # Example
///
/// ```
/// use sitescribe::crawler::parse_page;
/// use url::Url;
///
/// let html = r#"<html><body><h1>Hello</h1><a href="/b">B</a><a href="https://other.example/x">X</a></body></html>"#;
/// let page = Url::parse("https://example.com/a").unwrap();
/// let parsed = parse_page(html, &page, &page);
/// assert_eq!(parsed.text, "Hello B X");
/// assert_eq!(parsed.links.len(), 1);
/// assert_eq!(parsed.links[0].as_str(), "https://example.com/b");
/// ```
pub fn parse_page(markup: &str, page_url: &Url, base_url: &Url) -> ParsedPage {
    if markup.trim().is_empty() {
        return ParsedPage::default();
    }

    let document = Html::parse_document(markup);
    ParsedPage {
        text: document_text(&document),
        links: document_links(&document, page_url, base_url),
    }
}

/// Extracts the readable text of a page
///
/// Empty markup yields an empty string.
pub fn extract_text(markup: &str) -> String {
    if markup.trim().is_empty() {
        return String::new();
    }
    document_text(&Html::parse_document(markup))
}

/// Extracts same-host links from a page, in document order
pub fn extract_links(markup: &str, page_url: &Url, base_url: &Url) -> Vec<Url> {
    if markup.trim().is_empty() {
        return Vec::new();
    }
    document_links(&Html::parse_document(markup), page_url, base_url)
}

fn document_text(document: &Html) -> String {
    let mut text = String::new();

    for node in document.tree.root().descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| NON_CONTENT_ELEMENTS.contains(&el.name()))
        });
        if hidden {
            continue;
        }

        for word in fragment.split_whitespace() {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(word);
        }
    }

    text
}

fn document_links(document: &Html, page_url: &Url, base_url: &Url) -> Vec<Url> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, page_url))
        .filter(|url| {
            let keep = is_same_host(url, base_url);
            if !keep {
                tracing::trace!("Dropping off-site link {}", url);
            }
            keep
        })
        .collect()
}

/// Resolves a link href to a normalized absolute URL
///
/// Returns None if the link should be excluded:
/// - empty, fragment-only, `javascript:`, `mailto:` and `tel:` references
/// - references that do not resolve to an http(s) URL with a host
fn resolve_link(href: &str, page_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if SKIPPED_PREFIXES.iter().any(|prefix| lowered.starts_with(prefix)) {
        return None;
    }

    normalize_url(href, page_url).ok()
}
