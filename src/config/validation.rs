use crate::config::types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use crate::url::normalize_root;
use crate::ConfigError;

const MAX_TASKS_LIMIT: u32 = 1000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    normalize_root(&config.root_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid root-url '{}': {}", config.root_url, e))
    })?;

    if config.max_tasks < 1 || config.max_tasks > MAX_TASKS_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_tasks must be between 1 and {}, got {}",
            MAX_TASKS_LIMIT, config.max_tasks
        )));
    }

    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(
            "request_timeout must be >= 1 second".to_string(),
        ));
    }

    if config.connect_timeout < 1 {
        return Err(ConfigError::Validation(
            "connect_timeout must be >= 1 second".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.report_dir.is_empty() {
        return Err(ConfigError::Validation(
            "report_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}
