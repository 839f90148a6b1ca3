use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL, without any port, and
/// converts it to lowercase. Returns None for URLs without a host.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_cartographer::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM:8080/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://192.168.0.1/").unwrap();
/// assert_eq!(extract_domain(&url), Some("192.168.0.1".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}
