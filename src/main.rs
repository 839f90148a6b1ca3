//! Site-Cartographer main entry point
//!
//! This is the command-line interface for the Site-Cartographer site mapper.

use anyhow::Context;
use clap::Parser;
use site_cartographer::config::{load_config_with_hash, Config};
use site_cartographer::crawler::Coordinator;
use site_cartographer::output::{print_statistics, write_report, CrawlStatistics};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Site-Cartographer: a concurrent single-site mapper
///
/// Crawls one website from a root URL, follows only links that stay on the
/// root's domain, and writes a sitemap of every page's links and assets.
#[derive(Parser, Debug)]
#[command(name = "site-cartographer")]
#[command(version = "1.0.0")]
#[command(about = "A concurrent single-site mapper", long_about = None)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Target root url (default: http://bbc.co.uk/)
    #[arg(long, value_name = "URL")]
    target: Option<String>,

    /// Limit redirection chains (for 301, 302 etc.)
    #[arg(long, value_name = "N")]
    max_redirect: Option<u32>,

    /// Limit concurrent connections
    #[arg(long, value_name = "N")]
    max_tasks: Option<u32>,

    /// Directory the sitemap report is written to
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    apply_overrides(&mut config, &cli);
    config.validate().context("Invalid configuration")?;

    let report_dir = PathBuf::from(&config.output.report_dir);
    handle_crawl(&config, config_hash, &report_dir).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_cartographer=info,warn"),
            1 => EnvFilter::new("site_cartographer=debug,info"),
            2 => EnvFilter::new("site_cartographer=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Applies command-line flags on top of the loaded configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(target) = &cli.target {
        config.crawler.root_url = target.clone();
    }
    if let Some(max_redirect) = cli.max_redirect {
        config.crawler.max_redirect = max_redirect;
    }
    if let Some(max_tasks) = cli.max_tasks {
        config.crawler.max_tasks = max_tasks;
    }
    if let Some(dir) = &cli.output_dir {
        config.output.report_dir = dir.display().to_string();
    }
}

/// Runs the crawl, prints statistics and writes the report
async fn handle_crawl(
    config: &Config,
    config_hash: Option<String>,
    report_dir: &Path,
) -> anyhow::Result<()> {
    let coordinator = Coordinator::new(config).context("Failed to start crawl")?;

    let shutdown = coordinator.shutdown_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nInterrupted\n");
            shutdown.cancel();
        }
    });

    let mut report = coordinator.run().await;
    report.config_hash = config_hash;

    println!("Crawling complete in {:.3}s.", report.duration.as_secs_f64());
    print_statistics(&CrawlStatistics::from_report(&report));

    println!("Writing file...");
    let path = write_report(&report, report_dir).context("Failed to write report")?;
    println!("Sitemap written to {}", path.display());

    Ok(())
}
