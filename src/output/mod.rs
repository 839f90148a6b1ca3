//! Output module for crawl reports and statistics
//!
//! This module handles:
//! - Writing the plain-text sitemap report of a finished crawl
//! - Summarizing outcomes into crawl statistics for the terminal

mod report;
pub mod stats;

pub use report::{format_report, report_file_name, write_report, REPORT_FILE_FORMAT};
pub use stats::{print_statistics, CrawlStatistics};

use thiserror::Error;

/// Output-specific errors
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write report {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for output operations
pub type OutputResult<T> = Result<T, OutputError>;
