//! Site-Cartographer: a concurrent single-site mapper
//!
//! This crate crawls one website from a root URL, stays inside that site's domain,
//! and records a visitation log plus a site map of links and page assets.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Site-Cartographer operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("{url} raised client error {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Redirect limit reached for {target} from {url}")]
    RedirectLimit { url: String, target: String },

    #[error("Redirect loop detected at {target} from {url}")]
    RedirectLoop { url: String, target: String },

    #[error("Redirect from {url} leaves the crawl domain: {target}")]
    RedirectOutOfScope { url: String, target: String },

    #[error("Redirect from {url} has no usable Location header")]
    MissingLocation { url: String },

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Site-Cartographer operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_crawl, Coordinator, CrawlReport};
pub use state::{FetchOutcome, FetchState, SitemapEntry};
pub use crate::url::{extract_domain, normalize_link, normalize_root, DomainScope};
