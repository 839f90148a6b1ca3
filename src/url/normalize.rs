use crate::{UrlError, UrlResult};
use url::Url;

/// Resolves a link found on a page against that page's URL
///
/// The result is always absolute and never carries a fragment. Relative
/// paths (`./`, `../`), protocol-relative links (`//host/path`) and
/// absolute links are all handled by RFC 3986 resolution against `base`.
///
/// # Arguments
///
/// * `base` - The final URL of the page that referenced the link
/// * `link` - The raw attribute value, possibly relative
///
/// # Returns
///
/// * `Ok(Url)` - The absolute, defragmented URL
/// * `Err(UrlError)` - The link cannot be resolved
///
/// # Examples
///
/// ```
/// use site_cartographer::url::normalize_link;
/// use url::Url;
///
/// let base = Url::parse("http://example.com/a/").unwrap();
/// let url = normalize_link(&base, "../b#top").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/b");
/// ```
pub fn normalize_link(base: &Url, link: &str) -> UrlResult<Url> {
    let mut url = base
        .join(link.trim())
        .map_err(|e| UrlError::Parse(format!("{}: {}", link, e)))?;

    url.set_fragment(None);

    Ok(url)
}

/// Normalizes the root URL a crawl starts from
///
/// Bare hosts such as `example.com` get an `http://` prefix. The root must
/// use the HTTP or HTTPS scheme and name a host.
///
/// # Examples
///
/// ```
/// use site_cartographer::url::normalize_root;
///
/// let url = normalize_root("example.com/start#intro").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/start");
/// ```
pub fn normalize_root(input: &str) -> UrlResult<Url> {
    let input = input.trim();
    let candidate = if input.contains("://") {
        input.to_string()
    } else {
        format!("http://{}", input)
    };

    let mut url = Url::parse(&candidate).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);

    Ok(url)
}
