use crate::{ConfigError, ConfigResult};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Environment used when neither the command line nor `SPIDER_ENV` names one
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Main configuration structure for Mall-Spider
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub downloader: DownloaderConfig,
    pub spider: SpiderConfig,
    pub environments: BTreeMap<String, EnvironmentConfig>,
}

impl Config {
    /// Looks up a named environment
    ///
    /// # Returns
    ///
    /// * `Ok(&EnvironmentConfig)` - The environment's settings
    /// * `Err(ConfigError::UnknownEnvironment)` - No such section in the file
    pub fn environment(&self, name: &str) -> ConfigResult<&EnvironmentConfig> {
        self.environments
            .get(name)
            .ok_or_else(|| ConfigError::UnknownEnvironment(name.to_string()))
    }
}

/// HTTP download behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct DownloaderConfig {
    /// Maximum number of requests in flight
    pub concurrency: u32,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl DownloaderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Stage runner behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct SpiderConfig {
    /// How many pending items one stage invocation processes
    pub number: u32,
}

/// Per-environment storage settings
#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}
