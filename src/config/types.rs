use serde::Deserialize;

pub const DEFAULT_ROOT_URL: &str = "http://bbc.co.uk/";
pub const DEFAULT_MAX_REDIRECT: u32 = 10;
pub const DEFAULT_MAX_TASKS: u32 = 10;

/// Main configuration structure for Site-Cartographer
///
/// Every section and key is optional in the TOML file; missing values take
/// the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// URL the crawl starts from; its host defines the crawl domain
    #[serde(rename = "root-url")]
    pub root_url: String,

    /// Maximum number of redirects one navigation may follow
    #[serde(rename = "max-redirect")]
    pub max_redirect: u32,

    /// Number of concurrent fetch workers
    #[serde(rename = "max-tasks")]
    pub max_tasks: u32,

    /// Whole-request timeout (seconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout")]
    pub connect_timeout: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            root_url: DEFAULT_ROOT_URL.to_string(),
            max_redirect: DEFAULT_MAX_REDIRECT,
            max_tasks: DEFAULT_MAX_TASKS,
            request_timeout: 30,
            connect_timeout: 10,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value: `Name/Version`
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.crawler_name, self.crawler_version)
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the sitemap report is written to
    #[serde(rename = "report-dir")]
    pub report_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_dir: ".".to_string(),
        }
    }
}
