//! Crawler coordinator - worker pool and drain protocol
//!
//! This module contains the orchestration that runs a crawl:
//! - Launching a fixed number of fetch workers over a shared session
//! - Waiting until every admitted URL has been processed
//! - Stopping the workers cooperatively (or aborting them on interrupt)
//! - Collecting the final report

use crate::config::Config;
use crate::crawler::fetcher::fetch;
use crate::crawler::session::CrawlSession;
use crate::state::{FetchOutcome, SitemapEntry};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// How often workers log progress, in completed items
const PROGRESS_INTERVAL: usize = 10;

/// Everything a finished crawl produced
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub root_url: String,
    pub root_domain: String,
    pub max_redirect: u32,
    pub max_tasks: usize,

    /// One record per completed fetch, ordered by URL
    pub outcomes: Vec<FetchOutcome>,

    /// Visited page URL -> links and assets
    pub sitemap: BTreeMap<String, SitemapEntry>,

    /// Number of URLs admitted to the frontier
    pub urls_seen: usize,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration: Duration,

    /// True if the crawl was stopped before the frontier drained
    pub interrupted: bool,

    /// SHA-256 of the configuration file, when one was used
    pub config_hash: Option<String>,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    session: Arc<CrawlSession>,
    max_tasks: usize,
    shutdown: CancellationToken,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Validates the configuration, builds the HTTP client and admits the
    /// root URL. Failing here is fatal: no worker has started yet.
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(CrawlError)` - Invalid configuration or HTTP client failure
    pub fn new(config: &Config) -> crate::Result<Self> {
        config.validate()?;
        let session = CrawlSession::new(config)?;

        tracing::info!(
            "Crawling {} (domain {}) with {} workers, max {} redirects",
            session.root_url(),
            session.scope().root_domain(),
            config.crawler.max_tasks,
            config.crawler.max_redirect
        );

        Ok(Self {
            session: Arc::new(session),
            max_tasks: config.crawler.max_tasks as usize,
            shutdown: CancellationToken::new(),
        })
    }

    /// Token that interrupts the crawl when cancelled
    ///
    /// An interrupted crawl aborts in-flight fetches and returns the partial
    /// report with `interrupted` set.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Runs the crawl until the frontier drains (or shutdown is requested)
    pub async fn run(self) -> CrawlReport {
        let started_at = Utc::now();
        let clock = Instant::now();

        let stop = CancellationToken::new();
        let mut workers = JoinSet::new();
        for id in 0..self.max_tasks {
            workers.spawn(work(id, Arc::clone(&self.session), stop.clone()));
        }

        let interrupted = tokio::select! {
            _ = self.session.frontier().join() => false,
            _ = self.shutdown.cancelled() => true,
        };

        let finished_at = Utc::now();
        let duration = clock.elapsed();

        if interrupted {
            tracing::warn!("Crawl interrupted, aborting {} workers", workers.len());
            workers.abort_all();
        } else {
            stop.cancel();
        }

        while let Some(result) = workers.join_next().await {
            match result {
                Ok((processed, recorded)) => tracing::trace!(
                    "worker finished after {} items, {} recorded",
                    processed,
                    recorded
                ),
                Err(e) if e.is_cancelled() => {}
                Err(e) => tracing::error!("Worker task failed: {}", e),
            }
        }

        let (outcomes, sitemap) = self.session.take_results();

        tracing::info!(
            "Crawl completed: {} pages fetched, {} URLs seen in {:?}",
            outcomes.len(),
            self.session.frontier().seen_count(),
            duration
        );

        CrawlReport {
            root_url: self.session.root_url().to_string(),
            root_domain: self.session.scope().root_domain().to_string(),
            max_redirect: self.session.max_redirect(),
            max_tasks: self.max_tasks,
            outcomes,
            sitemap,
            urls_seen: self.session.frontier().seen_count(),
            started_at,
            finished_at,
            duration,
            interrupted,
            config_hash: None,
        }
    }
}

/// One fetch worker: take, fetch, mark done, until stopped
///
/// Returns how many items this worker processed and how many of them
/// recorded an outcome.
async fn work(id: usize, session: Arc<CrawlSession>, stop: CancellationToken) -> (usize, usize) {
    let frontier = session.frontier();
    let mut processed = 0;
    let mut recorded = 0;

    loop {
        let item = tokio::select! {
            _ = stop.cancelled() => break,
            item = frontier.take() => item,
        };

        debug_assert!(frontier.contains(&item.url));
        let url = item.url.clone();

        let state = fetch(&session, item).await;
        tracing::debug!("worker {} {} -> {}", id, url, state);

        frontier.mark_done();
        processed += 1;
        if state.records_outcome() {
            recorded += 1;
        }

        let completed = frontier.completed();
        if completed % PROGRESS_INTERVAL == 0 {
            tracing::info!(
                "Progress: {} processed, {} recorded, {} queued, {} seen",
                completed,
                session.outcome_count(),
                frontier.pending(),
                frontier.seen_count()
            );
        }
    }

    (processed, recorded)
}

/// Runs a complete crawl operation
///
/// # Example
///
/// ```no_run
/// use site_cartographer::config::Config;
/// use site_cartographer::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut config = Config::default();
/// config.crawler.root_url = "https://example.com/".to_string();
/// let report = run_crawl(&config).await?;
/// println!("{} pages", report.outcomes.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config) -> crate::Result<CrawlReport> {
    Ok(Coordinator::new(config)?.run().await)
}
