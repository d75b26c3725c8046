use crate::config::types::{Config, DownloaderConfig, EnvironmentConfig, SpiderConfig};
use crate::{ConfigError, ConfigResult};

const MAX_CONCURRENCY: u32 = 100;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_downloader_config(&config.downloader)?;
    validate_spider_config(&config.spider)?;
    validate_environments(config)?;
    Ok(())
}

fn validate_downloader_config(config: &DownloaderConfig) -> ConfigResult<()> {
    if config.concurrency < 1 || config.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.concurrency
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_spider_config(config: &SpiderConfig) -> ConfigResult<()> {
    if config.number < 1 {
        return Err(ConfigError::Validation(format!(
            "number must be >= 1, got {}",
            config.number
        )));
    }
    Ok(())
}

fn validate_environments(config: &Config) -> ConfigResult<()> {
    if config.environments.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [environments.<name>] section is required".to_string(),
        ));
    }

    for (name, environment) in &config.environments {
        validate_environment(name, environment)?;
    }

    Ok(())
}

fn validate_environment(name: &str, config: &EnvironmentConfig) -> ConfigResult<()> {
    if config.database_path.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "database-path of environment '{}' cannot be empty",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn create_test_config() -> Config {
        let mut environments = BTreeMap::new();
        environments.insert(
            "development".to_string(),
            EnvironmentConfig {
                database_path: "./dev.db".to_string(),
            },
        );
        Config {
            downloader: DownloaderConfig {
                concurrency: 10,
                timeout_secs: 30,
                user_agent: "mall-spider/0.1".to_string(),
            },
            spider: SpiderConfig { number: 100 },
            environments,
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&create_test_config()).is_ok());
    }

    #[test]
    fn test_concurrency_bounds() {
        let mut config = create_test_config();
        config.downloader.concurrency = 0;
        assert!(validate(&config).is_err());

        config.downloader.concurrency = 101;
        assert!(validate(&config).is_err());

        config.downloader.concurrency = 100;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_timeout() {
        let mut config = create_test_config();
        config.downloader.timeout_secs = 0;
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_blank_user_agent() {
        let mut config = create_test_config();
        config.downloader.user_agent = "  ".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_number() {
        let mut config = create_test_config();
        config.spider.number = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_environments_required() {
        let mut config = create_test_config();
        config.environments.clear();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_database_path() {
        let mut config = create_test_config();
        config.environments.insert(
            "production".to_string(),
            EnvironmentConfig {
                database_path: String::new(),
            },
        );
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("production"));
    }
}
