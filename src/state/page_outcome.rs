/// Outcome definitions for visited pages
///
/// Every URL taken off the frontier ends in exactly one of these outcomes.
use std::fmt;

/// Final outcome of one page in the crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageOutcome {
    // ===== Saved =====
    /// Static markup was good enough and was saved
    SavedStatic,

    /// Markup came from the rendering engine
    SavedRendered,

    /// Rendering was wanted but unavailable or failed; static markup was saved
    SavedStaticFallback,

    // ===== Skipped =====
    /// Robots.txt disallowed the URL
    RobotsDenied,

    // ===== Failed =====
    /// Server answered with a non-200 status
    HttpError,

    /// Transport failure and no rendered markup to fall back on
    Unreachable,
}

impl PageOutcome {
    /// Returns true if the page produced a row in the sink
    pub fn is_saved(&self) -> bool {
        matches!(
            self,
            Self::SavedStatic | Self::SavedRendered | Self::SavedStaticFallback
        )
    }

    /// Returns true if the page was never requested
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::RobotsDenied)
    }

    /// Returns true if the page was requested but yielded nothing
    pub fn is_error(&self) -> bool {
        matches!(self, Self::HttpError | Self::Unreachable)
    }

    /// Stable lowercase label used in logs and summaries
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SavedStatic => "saved_static",
            Self::SavedRendered => "saved_rendered",
            Self::SavedStaticFallback => "saved_static_fallback",
            Self::RobotsDenied => "robots_denied",
            Self::HttpError => "http_error",
            Self::Unreachable => "unreachable",
        }
    }

    /// Returns all possible outcomes
    pub fn all() -> [Self; 6] {
        [
            Self::SavedStatic,
            Self::SavedRendered,
            Self::SavedStaticFallback,
            Self::RobotsDenied,
            Self::HttpError,
            Self::Unreachable,
        ]
    }
}

impl fmt::Display for PageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
