//! Configuration module for Mall-Spider
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use mall_spider::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("spider.toml")).unwrap();
//! println!("Downloading with {} connections", config.downloader.concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, DownloaderConfig, EnvironmentConfig, SpiderConfig, DEFAULT_ENVIRONMENT};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
