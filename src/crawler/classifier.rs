//! Client-side rendering heuristic
//!
//! Decides from fetched markup whether a page probably needs a browser to show
//! its content. Two signals are OR-ed:
//!
//! 1. **Empty body**: the `<body>` has fewer than [`BODY_TEXT_THRESHOLD`]
//!    visible characters (each text node trimmed) and a `<script>` (inline text or `src`)
//!    matches a framework pattern.
//! 2. **Whole markup**: the raw document matches any framework pattern or any
//!    loading-shell pattern.
//!
//! This is a cheap syntactic check; false positives and negatives are expected.

use regex::{Regex, RegexBuilder};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

/// Bodies with fewer visible characters than this count as empty
pub const BODY_TEXT_THRESHOLD: usize = 100;

/// Where a pattern is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchScope {
    /// `<script>` contents and `src` of empty-bodied pages, and the whole markup
    ScriptAndDocument,

    /// The whole markup only
    DocumentOnly,
}

/// One case-insensitive regular expression and where it applies
#[derive(Debug, Clone, Copy)]
pub struct PatternRule {
    pub pattern: &'static str,
    pub scope: MatchScope,
}

const fn rule(pattern: &'static str, scope: MatchScope) -> PatternRule {
    PatternRule { pattern, scope }
}

/// Framework names, global-object markers and directive attributes, then
/// loading-shell idioms
pub const RENDERING_PATTERNS: &[PatternRule] = &[
    rule(r"react", MatchScope::ScriptAndDocument),
    rule(r"vue", MatchScope::ScriptAndDocument),
    rule(r"angular", MatchScope::ScriptAndDocument),
    rule(r"next.js", MatchScope::ScriptAndDocument),
    rule(r"nuxt", MatchScope::ScriptAndDocument),
    rule(r"data-react", MatchScope::ScriptAndDocument),
    rule(r"ng-app", MatchScope::ScriptAndDocument),
    rule(r"v-for", MatchScope::ScriptAndDocument),
    rule(r"__NEXT_DATA__", MatchScope::ScriptAndDocument),
    rule(r"window.__NUXT__", MatchScope::ScriptAndDocument),
    rule(r#"<div id="app">\s*</div>"#, MatchScope::DocumentOnly),
    rule(r#"<div id="root">\s*</div>"#, MatchScope::DocumentOnly),
    rule(r"getElementById\(.+?\)\.innerHTML", MatchScope::DocumentOnly),
    rule(r"document\.write\(", MatchScope::DocumentOnly),
    rule(r#"display:\s*none;.+?['"]initial['"]"#, MatchScope::DocumentOnly),
];

struct CompiledPattern {
    regex: Regex,
    scope: MatchScope,
}

static COMPILED: LazyLock<Vec<CompiledPattern>> = LazyLock::new(|| {
    RENDERING_PATTERNS
        .iter()
        .map(|rule| CompiledPattern {
            regex: RegexBuilder::new(rule.pattern)
                .case_insensitive(true)
                .build()
                .expect("hardcoded regex pattern is valid"),
            scope: rule.scope,
        })
        .collect()
});

/// Elements whose text is never visible
const INVISIBLE_TEXT_PARENTS: &[&str] = &["script", "style", "template", "noscript"];

/// Returns true when the markup probably needs client-side rendering
pub fn requires_rendering(markup: &str) -> bool {
    let document = Html::parse_document(markup);

    if let Some(body) = find_body(&document) {
        let visible = visible_text_len(body);
        if visible < BODY_TEXT_THRESHOLD && scripts_match_framework(&document) {
            tracing::debug!("Near-empty body ({} chars) with framework script", visible);
            return true;
        }
    }

    if let Some(hit) = COMPILED.iter().find(|p| p.regex.is_match(markup)) {
        tracing::debug!("Markup matches rendering pattern {}", hit.regex.as_str());
        return true;
    }

    false
}

fn find_body(document: &Html) -> Option<ElementRef<'_>> {
    let selector = Selector::parse("body").ok()?;
    document.select(&selector).next()
}

/// Counts characters of the text a reader would see in `root`
///
/// Each text node is trimmed at its ends; interior spaces between words count.
fn visible_text_len(root: ElementRef<'_>) -> usize {
    root.descendants()
        .filter_map(|node| node.value().as_text().map(|text| (node, text)))
        .filter(|(node, _)| {
            !node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| INVISIBLE_TEXT_PARENTS.contains(&el.name()))
            })
        })
        .map(|(_, text)| text.trim().chars().count())
        .sum()
}

/// Checks every `<script>`'s inline text and `src` against framework patterns
fn scripts_match_framework(document: &Html) -> bool {
    let framework = || {
        COMPILED
            .iter()
            .filter(|p| p.scope == MatchScope::ScriptAndDocument)
    };

    let Ok(selector) = Selector::parse("script") else {
        return false;
    };

    document.select(&selector).any(|script| {
        let inline: String = script.text().collect();
        let src = script.value().attr("src").unwrap_or("");
        framework().any(|p| {
            (!inline.is_empty() && p.regex.is_match(&inline))
                || (!src.is_empty() && p.regex.is_match(src))
        })
    })
}
