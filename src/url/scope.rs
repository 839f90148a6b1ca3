//! Domain scope policy
//!
//! Decides whether a host belongs to the same site as the crawl root. The
//! only equivalence applied is the `www.` prefix; bare IPv4-looking hosts
//! are never in scope unless they are the root itself.

use crate::url::extract_domain;
use crate::{UrlError, UrlResult};
use url::Url;

/// The scope of a crawl, fixed at session start from the root URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainScope {
    root_domain: String,
}

impl DomainScope {
    /// Derives the scope from the crawl's root URL
    pub fn from_root(root: &Url) -> UrlResult<Self> {
        let root_domain = extract_domain(root).ok_or(UrlError::MissingDomain)?;
        Ok(Self { root_domain })
    }

    /// Builds a scope directly from a root domain
    pub fn new(root_domain: &str) -> Self {
        Self {
            root_domain: root_domain.to_lowercase(),
        }
    }

    /// The lower-cased root domain
    pub fn root_domain(&self) -> &str {
        &self.root_domain
    }

    /// Checks if a bare host (no port) should be crawled
    ///
    /// # Examples
    ///
    /// ```
    /// use site_cartographer::url::DomainScope;
    ///
    /// let scope = DomainScope::new("example.com");
    /// assert!(scope.host_ok("example.com"));
    /// assert!(scope.host_ok("WWW.example.com"));
    /// assert!(!scope.host_ok("sub.example.com"));
    /// assert!(!scope.host_ok("192.168.0.1"));
    /// ```
    pub fn host_ok(&self, host: &str) -> bool {
        let host = host.to_lowercase();

        if host == self.root_domain {
            return true;
        }

        if is_ipv4_like(&host) {
            return false;
        }

        match host.strip_prefix("www.") {
            Some(bare) => bare == self.root_domain,
            None => format!("www.{}", host) == self.root_domain,
        }
    }

    /// Checks if a normalized URL may enter the frontier
    ///
    /// Only `http` and `https` URLs on an in-scope host are allowed.
    pub fn allows(&self, url: &Url) -> bool {
        if url.scheme() != "http" && url.scheme() != "https" {
            tracing::debug!("skipping non-http scheme in {}", url);
            return false;
        }

        match url.host_str() {
            Some(host) if self.host_ok(host) => true,
            _ => {
                tracing::debug!("skipping non-root host in {}", url);
                false
            }
        }
    }
}

/// Returns true for hosts made only of digits and dots
pub fn is_ipv4_like(host: &str) -> bool {
    host.chars().all(|c| c.is_ascii_digit() || c == '.')
}
