use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const ENV_PREFIX: &str = "SEO_CRAWLER";
const CONFIG_FILE: &str = "seo_crawler";

/// Process-wide settings, resolved once before the pipeline is built.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app_name: String,
    /// Whole-request timeout in seconds.
    pub request_timeout: u64,
    pub max_content_length: usize,
    pub max_redirects: usize,
    pub user_agent: String,
    pub batch_limit: usize,
    pub batch_concurrency: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "SEO Crawler".to_string(),
            request_timeout: 30,
            max_content_length: 10_000_000,
            max_redirects: 5,
            user_agent: "WebCrawler/1.0 (SEO Metadata Extractor)".to_string(),
            batch_limit: 10,
            batch_concurrency: 4,
        }
    }
}

impl Settings {
    /// Defaults, then `seo_crawler.{toml,json,yaml}` if present, then `SEO_CRAWLER_*` env vars.
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig {
            timeout: Duration::from_secs(self.request_timeout),
            max_content_length: self.max_content_length,
            max_redirects: self.max_redirects,
            user_agent: self.user_agent.clone(),
        }
    }
}

/// Immutable HTTP client settings the Fetcher is built from.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub timeout: Duration,
    pub max_content_length: usize,
    pub max_redirects: usize,
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Settings::default().fetcher_config()
    }
}
