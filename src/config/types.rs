use crate::url::ScopeMode;
use serde::Deserialize;

/// Main configuration structure for Tidewalk
///
/// Every section is optional in the TOML file; missing sections and keys take
/// the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub http: HttpConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Number of worker threads
    pub workers: usize,

    /// Interval between termination checks (milliseconds)
    pub poll_interval_ms: u64,

    /// How discovered links are matched against the seed's domain
    pub scope: ScopeMode,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            poll_interval_ms: 2000,
            scope: ScopeMode::Prefix,
        }
    }
}

/// HTTP transport configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HttpConfig {
    /// Maximum time to establish a connection (seconds)
    pub connect_timeout_secs: u64,

    /// Maximum time for a whole request, body included (seconds)
    pub request_timeout_secs: u64,

    /// Maximum number of redirects followed per request
    pub max_redirects: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            request_timeout_secs: 20,
            max_redirects: 10,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// URL with information about the crawler
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "Tidewalk".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://github.com/tidewalk/tidewalk".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}
