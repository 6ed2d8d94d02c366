use url::Url;

/// Extracts the host from a URL
///
/// The `url` parser already lowercases registered domain names, so the
/// returned host compares directly against other parsed URLs.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitescribe::url::extract_host;
///
/// let url = Url::parse("https://EXAMPLE.COM:8080/path").unwrap();
/// assert_eq!(extract_host(&url), Some("example.com"));
/// ```
pub fn extract_host(url: &Url) -> Option<&str> {
    url.host_str()
}

/// Returns true when both URLs have exactly the same host
///
/// Scheme, port and path are ignored; subdomains are different hosts.
pub fn is_same_host(url: &Url, base: &Url) -> bool {
    match (extract_host(url), extract_host(base)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
