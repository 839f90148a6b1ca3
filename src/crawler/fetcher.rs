//! HTTP fetcher and redirect resolver
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with automatic redirects disabled
//! - Classifying responses as redirects or completed fetches
//! - Following redirects through the frontier with a per-navigation budget
//! - Recording outcomes, sitemap entries and discovered links

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::crawler::frontier::FrontierItem;
use crate::crawler::parser::parse_response;
use crate::crawler::session::CrawlSession;
use crate::state::{FetchOutcome, FetchState};
use crate::url::normalize_link;
use crate::CrawlError;
use reqwest::header::{HeaderMap, CONTENT_TYPE, LOCATION};
use reqwest::{redirect::Policy, Client, Response, StatusCode};
use std::time::Duration;
use url::Url;

/// Status codes treated as redirects
pub const REDIRECT_STATUSES: [u16; 5] = [300, 301, 302, 303, 307];

/// Builds an HTTP client with proper configuration
///
/// Redirects are never followed by the client; the resolver re-admits
/// redirect targets through the frontier instead.
///
/// # Example
///
/// ```
/// use site_cartographer::config::{CrawlerConfig, UserAgentConfig};
/// use site_cartographer::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &CrawlerConfig::default());
/// assert!(client.is_ok());
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(crawler.request_timeout))
        .connect_timeout(Duration::from_secs(crawler.connect_timeout))
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Returns true for the status codes the crawler follows as redirects
pub fn is_redirect(status: StatusCode) -> bool {
    REDIRECT_STATUSES.contains(&status.as_u16())
}

fn transition(url: &Url, from: FetchState, to: FetchState) -> FetchState {
    debug_assert!(from.can_transition_to(to), "{} -> {}", from, to);
    tracing::trace!("{}: {} -> {}", url, from, to);
    to
}

/// Fetches one frontier item and runs it to a terminal state
///
/// # Flow
///
/// 1. GET the URL (redirects disabled)
/// 2. Transport failure → `TransportFailed`, nothing recorded
/// 3. Redirect status → resolve `Location` and re-admit with one less redirect
/// 4. Anything else → parse, admit in-scope links, record sitemap and outcome
///
/// The response is owned by this function and dropped on every path,
/// which hands the connection back to the pool.
pub async fn fetch(session: &CrawlSession, item: FrontierItem) -> FetchState {
    let state = transition(&item.url, FetchState::Pending, FetchState::Fetching);
    let terminal = fetch_item(session, &item).await;
    transition(&item.url, state, terminal)
}

async fn fetch_item(session: &CrawlSession, item: &FrontierItem) -> FetchState {
    let response = match session.client().get(item.url.clone()).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("{}. Aborting...", transport_error(&item.url, e));
            return FetchState::TransportFailed;
        }
    };

    if is_redirect(response.status()) {
        return match resolve_redirect(session, item, response.headers()) {
            Ok(target) => {
                tracing::info!("redirect to {} from {}", target, item.url);
                FetchState::Redirected
            }
            Err(e @ CrawlError::RedirectLimit { .. }) => {
                tracing::error!("{}", e);
                FetchState::RedirectDropped
            }
            Err(e @ CrawlError::RedirectLoop { .. }) => {
                tracing::debug!("{}", e);
                FetchState::RedirectDropped
            }
            Err(e) => {
                tracing::warn!("{}", e);
                FetchState::RedirectDropped
            }
        };
    }

    complete(session, response).await
}

/// Classifies a transport failure
fn transport_error(url: &Url, source: reqwest::Error) -> CrawlError {
    if source.is_timeout() {
        CrawlError::Timeout {
            url: url.to_string(),
        }
    } else {
        CrawlError::Http {
            url: url.to_string(),
            source,
        }
    }
}

/// Resolves a redirect and admits its target
///
/// Checks run in order: loop, budget, scope. A target that was already seen
/// is a loop even when no redirects remain, and an exhausted budget is
/// reported as a limit even when the target is also out of scope.
///
/// # Returns
///
/// * `Ok(Url)` - The target was admitted with `redirect_budget - 1`
/// * `Err(CrawlError)` - `MissingLocation`, `RedirectLoop`, `RedirectOutOfScope` or `RedirectLimit`
pub fn resolve_redirect(
    session: &CrawlSession,
    item: &FrontierItem,
    headers: &HeaderMap,
) -> crate::Result<Url> {
    let missing = || CrawlError::MissingLocation {
        url: item.url.to_string(),
    };

    let location = headers
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(missing)?;
    let target = normalize_link(&item.url, location).map_err(|_| missing())?;

    let loop_error = || CrawlError::RedirectLoop {
        url: item.url.to_string(),
        target: target.to_string(),
    };

    if session.frontier().contains(&target) {
        return Err(loop_error());
    }

    if item.redirect_budget == 0 {
        return Err(CrawlError::RedirectLimit {
            url: item.url.to_string(),
            target: target.to_string(),
        });
    }

    if !session.scope().allows(&target) {
        return Err(CrawlError::RedirectOutOfScope {
            url: item.url.to_string(),
            target: target.to_string(),
        });
    }

    // Another worker may have admitted the target since the check above.
    if !session.admit(target.clone(), item.redirect_budget - 1) {
        return Err(loop_error());
    }

    Ok(target)
}

/// Handles a non-redirect response
async fn complete(session: &CrawlSession, response: Response) -> FetchState {
    let status = response.status().as_u16();
    let final_url = response.url().clone();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let body = match response.bytes().await {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!("Failed to read body of {}: {}", final_url, e);
            session.record_outcome(FetchOutcome {
                url: final_url.to_string(),
                status,
                error: Some(e.to_string()),
                size: 0,
                content_type: None,
                encoding: None,
                num_urls: 0,
                num_new_urls: 0,
            });
            return FetchState::Completed;
        }
    };

    let parsed = parse_response(
        status,
        &final_url,
        content_type.as_deref(),
        &body,
        session.scope(),
    );
    let mut outcome = parsed.outcome(final_url.as_str(), 0);

    if let Some(page) = parsed.page {
        outcome.num_new_urls = page
            .links
            .into_iter()
            .filter(|link| session.admit(link.clone(), session.max_redirect()))
            .count();
        session.record_page(final_url.as_str(), page.assets, page.all_links);
    }

    tracing::debug!(
        "{} {} ({} bytes, {} links, {} new)",
        status,
        final_url,
        outcome.size,
        outcome.num_urls,
        outcome.num_new_urls
    );
    session.record_outcome(outcome);

    FetchState::Completed
}
