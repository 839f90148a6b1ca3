//! Configuration module for Site-Cartographer
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A configuration file is optional: every key has a default, and command-line
//! flags may override any crawler setting afterwards.
//!
//! # Example
//!
//! ```no_run
//! use site_cartographer::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawl.toml")).unwrap();
//! println!("Crawler will use {} workers", config.crawler.max_tasks);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, UserAgentConfig, DEFAULT_MAX_REDIRECT,
    DEFAULT_MAX_TASKS, DEFAULT_ROOT_URL,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};

impl Config {
    /// Re-validates the configuration, e.g. after command-line overrides
    pub fn validate(&self) -> crate::ConfigResult<()> {
        validation::validate(self)
    }
}
