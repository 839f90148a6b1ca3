//! Statistics generation from a finished crawl
//!
//! This module summarizes the statistics log of a crawl and prints it to
//! stdout.

use crate::crawler::CrawlReport;
use std::collections::BTreeMap;

/// Crawl statistics summary
#[derive(Debug, Clone, Default)]
pub struct CrawlStatistics {
    /// Number of recorded outcomes
    pub total_pages: usize,

    /// Count of outcomes by HTTP status
    pub pages_by_status: BTreeMap<u16, usize>,

    /// Sum of all body sizes
    pub total_bytes: usize,

    /// Sum of in-scope links over all pages
    pub total_links: usize,

    /// Links that were first discovered on their page
    pub new_links: usize,

    /// Outcomes whose body could not be read
    pub errors: usize,

    /// Pages with a sitemap entry
    pub sitemap_pages: usize,

    /// URLs admitted to the frontier
    pub urls_seen: usize,
}

impl CrawlStatistics {
    /// Computes statistics from a crawl report
    pub fn from_report(report: &CrawlReport) -> Self {
        let mut stats = Self {
            total_pages: report.outcomes.len(),
            sitemap_pages: report.sitemap.len(),
            urls_seen: report.urls_seen,
            ..Self::default()
        };

        for outcome in &report.outcomes {
            *stats.pages_by_status.entry(outcome.status).or_insert(0) += 1;
            stats.total_bytes += outcome.size;
            stats.total_links += outcome.num_urls;
            stats.new_links += outcome.num_new_urls;
            if outcome.error.is_some() {
                stats.errors += 1;
            }
        }

        stats
    }

    /// Share of outcomes with a 2xx status, in percent
    pub fn success_rate(&self) -> f64 {
        if self.total_pages == 0 {
            return 0.0;
        }
        let ok: usize = self
            .pages_by_status
            .range(200..300)
            .map(|(_, count)| count)
            .sum();
        (ok as f64 / self.total_pages as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Pages fetched: {}", stats.total_pages);
    println!("  URLs seen: {}", stats.urls_seen);
    println!("  Pages mapped: {}", stats.sitemap_pages);
    println!("  Bytes downloaded: {}", stats.total_bytes);
    println!(
        "  Links found: {} ({} new)",
        stats.total_links, stats.new_links
    );
    println!();

    if !stats.pages_by_status.is_empty() {
        println!("Pages by Status:");
        for (status, count) in &stats.pages_by_status {
            let percentage = (*count as f64 / stats.total_pages as f64) * 100.0;
            println!("  {}: {} ({:.1}%)", status, count, percentage);
        }
        println!();
    }

    if stats.errors > 0 {
        println!("Body read errors: {}\n", stats.errors);
    }

    println!("Success Rate: {:.1}%", stats.success_rate());
}
