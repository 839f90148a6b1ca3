//! Response parser for extracting links and assets
//!
//! This module handles:
//! - Scanning HTML for anchor `href`s and page assets (stylesheets, images, scripts)
//! - Parsing the `Content-Type` header into media type and charset
//! - Turning a completed response into outcome data and in-scope links

use crate::state::{FetchOutcome, PageAssets};
use crate::url::{normalize_link, DomainScope};
use encoding_rs::{Encoding, UTF_8};
use scraper::{Html, Selector};
use std::collections::{BTreeSet, HashSet};
use url::Url;

/// Media types whose bodies are scanned for links
pub const PARSEABLE_CONTENT_TYPES: &[&str] = &["text/html", "application/xml"];

/// Charset assumed when the Content-Type header declares none
pub const DEFAULT_CHARSET: &str = "utf-8";

/// Raw references found by scanning a document
#[derive(Debug, Clone, Default)]
pub struct MarkupScan {
    /// Every anchor `href`, in document order
    pub hrefs: Vec<String>,

    /// Stylesheet, image and script references
    pub assets: PageAssets,
}

/// Scans an HTML document for anchors and assets in a single parse
///
/// Malformed markup never fails: html5ever recovers what it can, and
/// anything unrecoverable simply yields no references.
///
/// # Example
///
/// ```
/// use site_cartographer::crawler::scan_markup;
///
/// let scan = scan_markup(r#"<a href="/a">A</a><img src="/logo.png">"#);
/// assert_eq!(scan.hrefs, vec!["/a"]);
/// assert_eq!(scan.assets.images, vec!["/logo.png"]);
/// ```
pub fn scan_markup(html: &str) -> MarkupScan {
    let document = Html::parse_document(html);

    MarkupScan {
        hrefs: select_attr(&document, "a[href]", "href"),
        assets: PageAssets {
            stylesheets: select_attr(&document, "link[rel~=stylesheet][href]", "href"),
            images: select_attr(&document, "img[src]", "src"),
            scripts: select_attr(&document, "script[src]", "src"),
        },
    }
}

/// Collects the value of `attr` for every element matching `selector`
fn select_attr(document: &Html, selector: &str, attr: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr(attr))
        .map(str::to_string)
        .collect()
}

/// Splits a Content-Type header into lowercase media type and charset
///
/// Parameter names are case-insensitive and quoted values are unquoted.
/// The charset defaults to `utf-8`.
///
/// # Example
///
/// ```
/// use site_cartographer::crawler::parse_content_type;
///
/// let (media, charset) = parse_content_type("Text/HTML; Charset=\"ISO-8859-1\"");
/// assert_eq!(media, "text/html");
/// assert_eq!(charset, "ISO-8859-1");
/// ```
pub fn parse_content_type(header: &str) -> (String, String) {
    let mut parts = header.split(';');
    let media_type = parts.next().unwrap_or_default().trim().to_lowercase();

    let charset = parts
        .filter_map(|param| param.split_once('='))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("charset"))
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_CHARSET.to_string());

    (media_type, charset)
}

/// Links and assets of a parsed page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// In-scope links in first-seen document order, deduplicated
    pub links: Vec<Url>,

    /// Every normalized link (in and out of scope), for the sitemap
    pub all_links: BTreeSet<String>,

    pub assets: PageAssets,
}

/// Data extracted from one completed (non-redirect) response
#[derive(Debug, Clone)]
pub struct ParsedResponse {
    pub status: u16,
    pub size: usize,
    pub content_type: Option<String>,
    pub encoding: Option<String>,

    /// Present only for 200 responses with a parseable content type
    pub page: Option<ParsedPage>,
}

impl ParsedResponse {
    /// Number of in-scope links found on the page
    pub fn num_urls(&self) -> usize {
        self.page.as_ref().map_or(0, |page| page.links.len())
    }

    /// Builds the statistics record for this response
    pub fn outcome(&self, url: &str, num_new_urls: usize) -> FetchOutcome {
        FetchOutcome {
            url: url.to_string(),
            status: self.status,
            error: None,
            size: self.size,
            content_type: self.content_type.clone(),
            encoding: self.encoding.clone(),
            num_urls: self.num_urls(),
            num_new_urls,
        }
    }
}

/// Parses a completed response
///
/// Links are resolved against `final_url`, the URL the response was actually
/// served from, and then filtered through the domain scope.
///
/// # Arguments
///
/// * `status` - HTTP status code
/// * `final_url` - URL of the response
/// * `content_type` - Raw Content-Type header, if any
/// * `body` - Response body bytes
/// * `scope` - The crawl's domain scope
pub fn parse_response(
    status: u16,
    final_url: &Url,
    content_type: Option<&str>,
    body: &[u8],
    scope: &DomainScope,
) -> ParsedResponse {
    let mut parsed = ParsedResponse {
        status,
        size: body.len(),
        content_type: None,
        encoding: None,
        page: None,
    };

    if status != 200 {
        return parsed;
    }

    let (media_type, charset) = match content_type {
        Some(header) => {
            let (media, charset) = parse_content_type(header);
            (Some(media), charset)
        }
        None => (None, DEFAULT_CHARSET.to_string()),
    };
    // Unknown labels fall back to UTF-8, as reqwest's `Response::text` does.
    let decoder = Encoding::for_label(charset.as_bytes()).unwrap_or(UTF_8);
    parsed.encoding = Some(charset);

    let parseable = media_type
        .as_deref()
        .is_some_and(|media| PARSEABLE_CONTENT_TYPES.contains(&media));
    parsed.content_type = media_type;

    if parseable {
        let (text, _, _) = decoder.decode(body);
        parsed.page = Some(parse_page(&text, final_url, scope));
    }

    parsed
}

/// Extracts and normalizes the links and assets of an HTML page
pub fn parse_page(html: &str, final_url: &Url, scope: &DomainScope) -> ParsedPage {
    let scan = scan_markup(html);

    let mut page = ParsedPage {
        assets: scan.assets,
        ..ParsedPage::default()
    };
    let mut in_scope = HashSet::new();

    for href in &scan.hrefs {
        let normalized = match normalize_link(final_url, href) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Failed to normalize link on {}: {}", final_url, e);
                continue;
            }
        };

        page.all_links.insert(normalized.to_string());

        if scope.allows(&normalized) && in_scope.insert(normalized.to_string()) {
            page.links.push(normalized);
        }
    }

    page
}
