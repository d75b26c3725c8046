//! Mall-Spider: a multi-site e-commerce scraper
//!
//! This crate extracts category trees, listing-page pagination, product links
//! and product details from several Chinese e-commerce sites. The extraction
//! core is a set of pure functions over parsed HTML; the crawler and storage
//! modules wire them into a resumable, stage-by-stage scrape.

pub mod config;
pub mod crawler;
pub mod digger;
pub mod document;
pub mod fetcher;
pub mod output;
pub mod paginater;
pub mod parser;
pub mod site;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Mall-Spider operations
#[derive(Debug, Error)]
pub enum SpiderError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Incomplete HTML document from {url}")]
    BadHtml { url: String },

    #[error("Unexpected HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Page layout of {site} has changed: {message}")]
    LayoutChanged { site: site::Site, message: String },

    #[error("Unknown site: {0}")]
    UnknownSite(String),

    #[error("Unknown stage: {0}")]
    UnknownStage(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unknown environment: {0}")]
    UnknownEnvironment(String),
}

/// Result type alias for Mall-Spider operations
pub type Result<T> = std::result::Result<T, SpiderError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Spider, Stage};
pub use document::Document;
pub use parser::{Category, Comment, ProductAttributes};
pub use site::Site;
pub use url::{map_to_query, query_to_map, QueryMap};
