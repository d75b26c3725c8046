//! Storage module for persisting scrape progress
//!
//! This module handles all database operations for the spider, including:
//! - SQLite database initialization and schema management
//! - The category tree and its listing pages and product URLs
//! - Parsed products and their comments
//! - Run tracking

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::site::Site;
use crate::Result;
use std::path::Path;

/// Opens (creating if necessary) a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(SpiderError)` - Failed to open the file or create the schema
pub fn open_storage(path: &Path) -> Result<SqliteStorage> {
    SqliteStorage::new(path)
}

/// A category in the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRecord {
    pub id: i64,
    pub kind: Site,
    pub name: String,
    pub url: String,
    pub parent_id: Option<i64>,
    pub completed: bool,
}

/// A listing page of a category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    pub id: i64,
    pub kind: Site,
    pub url: String,
    pub category_id: i64,
    pub completed: bool,
}

/// A product detail URL found on a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductUrlRecord {
    pub id: i64,
    pub kind: Site,
    pub url: String,
    pub page_id: i64,
    pub completed: bool,
}

/// A recorded stage invocation
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub stage: String,
    pub kind: Site,
    pub config_hash: String,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub status: RunStatus,
}

/// Status of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Per-site record counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindCounts {
    pub categories: u64,
    pub categories_completed: u64,
    pub pages: u64,
    pub pages_completed: u64,
    pub product_urls: u64,
    pub product_urls_completed: u64,
    pub products: u64,
}
