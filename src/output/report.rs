//! Plain-text sitemap report
//!
//! The report lists every fetched URL with its status, then the assets and
//! links of each parsed page.

use crate::crawler::CrawlReport;
use crate::output::{OutputError, OutputResult};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};

/// `strftime` pattern of report file names
pub const REPORT_FILE_FORMAT: &str = "sitemap_%H_%M_%d_%m_%y.txt";

const BANNER: &str = "*****************";

/// Report file name for the given local time
pub fn report_file_name(at: DateTime<Local>) -> String {
    at.format(REPORT_FILE_FORMAT).to_string()
}

/// Writes the report into `dir` and returns the path of the new file
///
/// # Arguments
///
/// * `report` - The finished crawl
/// * `dir` - Directory the report is written to; created if missing
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written report
/// * `Err(OutputError)` - The directory or file could not be written
pub fn write_report(report: &CrawlReport, dir: &Path) -> OutputResult<PathBuf> {
    fs::create_dir_all(dir)?;

    let path = dir.join(report_file_name(Local::now()));
    fs::write(&path, format_report(report)).map_err(|source| OutputError::Write {
        path: path.display().to_string(),
        source,
    })?;

    tracing::info!("Report written to {}", path.display());
    Ok(path)
}

/// Formats a crawl report as text
pub fn format_report(report: &CrawlReport) -> String {
    let mut text = String::new();

    text.push_str(&format!("{} Sitemap {}\n", BANNER, BANNER));
    text.push_str(&format!("Root: {}\n", report.root_url));
    text.push_str(&format!(
        "Started: {}\nFinished: {}\n",
        report.started_at.to_rfc3339(),
        report.finished_at.to_rfc3339()
    ));
    if let Some(hash) = &report.config_hash {
        text.push_str(&format!("Config hash: {}\n", hash));
    }
    if report.interrupted {
        text.push_str("Interrupted: partial results\n");
    }
    text.push('\n');

    for (i, outcome) in report.outcomes.iter().enumerate() {
        text.push_str(&format!("{}. {}  {}", i + 1, outcome.url, outcome.status));
        if let Some(error) = &outcome.error {
            text.push_str(&format!("  ({})", error));
        }
        text.push('\n');
    }
    text.push_str("\n\n");

    for (url, entry) in &report.sitemap {
        text.push_str(&format!("\n{} Assets on {} {}\n", BANNER, url, BANNER));
        let assets = &entry.assets;
        for (kind, refs) in [
            ("stylesheet", &assets.stylesheets),
            ("image", &assets.images),
            ("script", &assets.scripts),
        ] {
            for asset in refs {
                text.push_str(&format!("\n - [{}] {}", kind, asset));
            }
        }

        text.push_str(&format!("\n\n{} Links on {} {}\n", BANNER, url, BANNER));
        for link in &entry.links {
            text.push_str(&format!("\n - {}", link));
        }
        text.push_str("\n\n");
    }

    text
}
