//! Crawl frontier: seen set, FIFO work queue and drain barrier
//!
//! This module handles:
//! - Atomic admission of URLs (seen-check and enqueue under one lock)
//! - Suspending workers until an item is available
//! - Counting admitted vs. finished items to detect when the crawl has drained

use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::Notify;
use url::Url;

/// A URL waiting to be fetched, with the redirects it may still follow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierItem {
    /// The URL to fetch (absolute, no fragment)
    pub url: Url,

    /// Remaining redirects for this navigation
    pub redirect_budget: u32,
}

#[derive(Debug, Default)]
struct FrontierState {
    seen: HashSet<String>,
    queue: VecDeque<FrontierItem>,
    admitted: usize,
    completed: usize,
}

impl FrontierState {
    fn is_drained(&self) -> bool {
        self.admitted == self.completed && self.queue.is_empty()
    }
}

/// Frontier shared by all fetch workers of one crawl
///
/// "Seen" means "admitted", not "fetched": a URL is added to the seen set
/// when it is enqueued, so a URL whose fetch is still in flight can never be
/// enqueued a second time.
#[derive(Debug, Default)]
pub struct Frontier {
    state: Mutex<FrontierState>,
    available: Notify,
    drained: Notify,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Admits a URL unless it was seen before
    ///
    /// This is the only way into the frontier. Redirect targets and links
    /// discovered on pages both go through here.
    ///
    /// # Returns
    ///
    /// * `true` - The URL was new and has been queued
    /// * `false` - The URL was already seen; nothing changed
    pub fn admit(&self, url: Url, redirect_budget: u32) -> bool {
        {
            let mut state = self.lock();
            if !state.seen.insert(url.as_str().to_string()) {
                return false;
            }

            tracing::debug!("adding {} (redirect budget {})", url, redirect_budget);
            state.admitted += 1;
            state.queue.push_back(FrontierItem {
                url,
                redirect_budget,
            });
        }

        self.available.notify_one();
        true
    }

    /// Returns true if the URL has ever been admitted
    pub fn contains(&self, url: &Url) -> bool {
        self.lock().seen.contains(url.as_str())
    }

    /// Waits for the next item in admission order
    ///
    /// The future only completes once an item is available, so cancellation
    /// is done by dropping it (e.g. from a `tokio::select!` branch).
    pub async fn take(&self) -> FrontierItem {
        loop {
            let (next, more) = {
                let mut state = self.lock();
                let next = state.queue.pop_front();
                (next, !state.queue.is_empty())
            };

            if let Some(item) = next {
                if more {
                    // Pass the wake-up on so a sleeping worker sees the rest.
                    self.available.notify_one();
                }
                return item;
            }

            self.available.notified().await;
        }
    }

    /// Signals that one previously taken item has finished processing
    pub fn mark_done(&self) {
        let drained = {
            let mut state = self.lock();
            if state.completed >= state.admitted {
                tracing::warn!("mark_done called more times than items were admitted");
                return;
            }
            state.completed += 1;
            state.is_drained()
        };

        if drained {
            self.drained.notify_waiters();
        }
    }

    /// Returns true when every admitted item is done and nothing is queued
    pub fn is_drained(&self) -> bool {
        self.lock().is_drained()
    }

    /// Waits until the frontier is drained
    pub async fn join(&self) {
        loop {
            let notified = self.drained.notified();
            tokio::pin!(notified);
            // Register before checking so a concurrent `mark_done` cannot be missed.
            notified.as_mut().enable();

            if self.is_drained() {
                return;
            }

            notified.await;
        }
    }

    /// Number of URLs ever admitted
    pub fn seen_count(&self) -> usize {
        self.lock().seen.len()
    }

    /// Number of items waiting in the queue
    pub fn pending(&self) -> usize {
        self.lock().queue.len()
    }

    /// Number of items marked done
    pub fn completed(&self) -> usize {
        self.lock().completed
    }
}
