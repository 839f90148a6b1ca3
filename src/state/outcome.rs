//! Fetch outcomes and the append-only statistics log

/// The record of one completed (non-redirect) fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    /// Final URL of the response
    pub url: String,

    /// HTTP status code
    pub status: u16,

    /// Error raised while reading the body, if any
    pub error: Option<String>,

    /// Body size in bytes
    pub size: usize,

    /// Media type from the Content-Type header (200 responses only)
    pub content_type: Option<String>,

    /// Declared charset, `utf-8` when the header has none (200 responses only)
    pub encoding: Option<String>,

    /// Number of in-scope links extracted from the page
    pub num_urls: usize,

    /// Number of those links that had not been seen before
    pub num_new_urls: usize,
}

/// Append-only log of fetch outcomes
#[derive(Debug, Default)]
pub struct StatisticsLog {
    outcomes: Vec<FetchOutcome>,
}

impl StatisticsLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one outcome
    pub fn record(&mut self, outcome: FetchOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Consumes the log and returns its outcomes ordered by URL
    pub fn into_sorted(mut self) -> Vec<FetchOutcome> {
        self.outcomes.sort_by(|a, b| a.url.cmp(&b.url));
        self.outcomes
    }
}
