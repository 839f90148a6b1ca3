//! State module for tracking crawl progress
//!
//! This module provides the per-item fetch state machine and the two
//! accumulators a crawl fills in while it runs.
//!
//! # Components
//!
//! - `FetchState`: Lifecycle of one frontier item (pending, fetching, redirected, ...)
//! - `Sitemap`: Links and assets recorded for every parsed page
//! - `StatisticsLog`: One `FetchOutcome` per completed fetch

mod fetch_state;
mod outcome;
mod sitemap;

// Re-export main types
pub use fetch_state::FetchState;
pub use outcome::{FetchOutcome, StatisticsLog};
pub use sitemap::{PageAssets, Sitemap, SitemapEntry};
