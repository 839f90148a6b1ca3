//! Shared state of one crawl
//!
//! A `CrawlSession` is created once per crawl and shared by every worker
//! behind an `Arc`. All mutation goes through `admit`, `record_outcome` and
//! `record_page`, so the dedup and accumulation invariants hold under
//! concurrent access.

use crate::config::Config;
use crate::crawler::fetcher::build_http_client;
use crate::crawler::frontier::Frontier;
use crate::state::{FetchOutcome, PageAssets, Sitemap, SitemapEntry, StatisticsLog};
use crate::url::{normalize_root, DomainScope};
use crate::CrawlError;
use reqwest::Client;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};
use url::Url;

/// Shared, mutate-in-place state of a running crawl
pub struct CrawlSession {
    root_url: Url,
    scope: DomainScope,
    max_redirect: u32,
    client: Client,
    frontier: Frontier,
    sitemap: Mutex<Sitemap>,
    statistics: Mutex<StatisticsLog>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl CrawlSession {
    /// Creates a session and admits the root URL
    ///
    /// The root domain is derived here and never recomputed.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlSession)` - Ready to be drained by workers
    /// * `Err(CrawlError)` - Invalid root URL or the HTTP client could not be built
    pub fn new(config: &Config) -> crate::Result<Self> {
        let root_url = normalize_root(&config.crawler.root_url)?;
        let scope = DomainScope::from_root(&root_url)?;
        let client =
            build_http_client(&config.user_agent, &config.crawler).map_err(CrawlError::Client)?;

        let session = Self {
            root_url,
            scope,
            max_redirect: config.crawler.max_redirect,
            client,
            frontier: Frontier::new(),
            sitemap: Mutex::new(Sitemap::new()),
            statistics: Mutex::new(StatisticsLog::new()),
        };

        session.admit(session.root_url.clone(), session.max_redirect);

        Ok(session)
    }

    pub fn root_url(&self) -> &Url {
        &self.root_url
    }

    pub fn scope(&self) -> &DomainScope {
        &self.scope
    }

    pub fn max_redirect(&self) -> u32 {
        self.max_redirect
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// Admits a URL to the frontier; returns true if it was new
    pub fn admit(&self, url: Url, redirect_budget: u32) -> bool {
        self.frontier.admit(url, redirect_budget)
    }

    /// Appends one outcome to the statistics log
    pub fn record_outcome(&self, outcome: FetchOutcome) {
        lock(&self.statistics).record(outcome);
    }

    /// Records the sitemap entry of a parsed page
    pub fn record_page(&self, page_url: &str, assets: PageAssets, links: BTreeSet<String>) {
        lock(&self.sitemap).record(page_url, assets, links);
    }

    pub fn outcome_count(&self) -> usize {
        lock(&self.statistics).len()
    }

    /// Moves the accumulated results out of the session
    ///
    /// Outcomes are ordered by URL. Intended to be called once, after all
    /// workers have stopped.
    pub fn take_results(&self) -> (Vec<FetchOutcome>, BTreeMap<String, SitemapEntry>) {
        let statistics = std::mem::take(&mut *lock(&self.statistics));
        let sitemap = std::mem::take(&mut *lock(&self.sitemap));
        (statistics.into_sorted(), sitemap.into_entries())
    }
}
