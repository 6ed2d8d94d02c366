use crate::UrlError;
use url::Url;

/// Normalizes a URL reference into the absolute form used by the frontier
///
/// # Normalization Steps
///
/// 1. Resolve the reference against `base` when it is relative
/// 2. Reject anything that is not http(s) or has no host
/// 3. Lowercase the host and drop default ports (done by the parser)
/// 4. Remove dot segments from the path (done by the parser)
/// 5. Remove the fragment
/// 6. Remove an empty query string (trailing `?`)
///
/// Feeding the output back in yields the same URL.
///
/// # Arguments
///
/// * `input` - The URL or relative reference to normalize
/// * `base` - The URL relative references are resolved against
///
/// # Returns
///
/// * `Ok(Url)` - Normalized absolute URL
/// * `Err(UrlError)` - Failed to resolve or not crawlable
///
/// # Examples
///
/// ```
/// use sitescribe::url::normalize_url;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/docs/").unwrap();
/// let url = normalize_url("../about#team", &base).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/about");
/// ```
pub fn normalize_url(input: &str, base: &Url) -> Result<Url, UrlError> {
    let mut url = base
        .join(input.trim())
        .map_err(|e| UrlError::Parse(format!("{}: {}", input, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    if url.query() == Some("") {
        url.set_query(None);
    }

    Ok(url)
}

/// Normalizes a string that is expected to already be absolute
pub fn normalize_absolute(input: &str) -> Result<Url, UrlError> {
    let url = Url::parse(input.trim()).map_err(|e| UrlError::Parse(format!("{}: {}", input, e)))?;
    normalize_url(url.as_str(), &url)
}
