//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The frontier: seen set, FIFO queue and drain barrier
//! - HTTP fetching with manual, budgeted redirect following
//! - HTML parsing and link/asset extraction
//! - The worker pool that drains the frontier

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod session;

pub use coordinator::{run_crawl, Coordinator, CrawlReport};
pub use fetcher::{build_http_client, fetch, is_redirect, resolve_redirect, REDIRECT_STATUSES};
pub use frontier::{Frontier, FrontierItem};
pub use parser::{
    parse_content_type, parse_page, parse_response, scan_markup, MarkupScan, ParsedPage,
    ParsedResponse, DEFAULT_CHARSET, PARSEABLE_CONTENT_TYPES,
};
pub use session::CrawlSession;
