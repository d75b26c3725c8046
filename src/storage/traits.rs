//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::parser::ProductAttributes;
use crate::site::Site;
use crate::storage::{
    CategoryRecord, KindCounts, PageRecord, ProductUrlRecord, RunRecord, RunStatus,
};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Each stage reads a batch of uncompleted records of one kind, hands them
/// to the downloader, and writes what it extracts. Every `insert_or_get_*`
/// method is idempotent on the record's URL, so a stage can be re-run over
/// a partially processed batch.
pub trait Storage {
    // ===== Run Management =====

    /// Records the start of a stage invocation
    ///
    /// # Returns
    ///
    /// The ID of the newly created run
    fn create_run(&mut self, stage: &str, kind: Site, config_hash: &str) -> StorageResult<i64>;

    /// Stamps a run with its final status and finish time
    fn finish_run(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()>;

    /// Most recent runs first
    fn latest_runs(&self, limit: u32) -> StorageResult<Vec<RunRecord>>;

    // ===== Categories =====

    /// Inserts a category or returns the ID of the one with the same URL
    fn insert_or_get_category(&mut self, kind: Site, name: &str, url: &str) -> StorageResult<i64>;

    /// Gets a category by ID
    fn get_category(&self, category_id: i64) -> StorageResult<CategoryRecord>;

    /// Makes `parent_id` the parent of `category_id`
    fn set_category_parent(&mut self, category_id: i64, parent_id: i64) -> StorageResult<()>;

    /// Uncompleted categories of `kind` without children, oldest first
    fn pending_leaf_categories(&self, kind: Site, limit: u32)
        -> StorageResult<Vec<CategoryRecord>>;

    fn complete_category(&mut self, category_id: i64) -> StorageResult<()>;

    // ===== Listing Pages =====

    /// Inserts a listing page or returns the ID of the one with the same URL
    fn insert_or_get_page(&mut self, kind: Site, category_id: i64, url: &str)
        -> StorageResult<i64>;

    /// Uncompleted listing pages of `kind`, oldest first
    fn pending_pages(&self, kind: Site, limit: u32) -> StorageResult<Vec<PageRecord>>;

    fn complete_page(&mut self, page_id: i64) -> StorageResult<()>;

    // ===== Product URLs =====

    /// Inserts a product URL or returns the ID of the one with the same URL
    fn insert_or_get_product_url(&mut self, kind: Site, page_id: i64, url: &str)
        -> StorageResult<i64>;

    /// Uncompleted product URLs of `kind`, oldest first
    fn pending_product_urls(&self, kind: Site, limit: u32)
        -> StorageResult<Vec<ProductUrlRecord>>;

    fn complete_product_url(&mut self, product_url_id: i64) -> StorageResult<()>;

    // ===== Products =====

    /// Stores a parsed product together with its comments
    ///
    /// A product parsed again from the same product URL replaces the
    /// earlier row and its comments.
    ///
    /// # Arguments
    ///
    /// * `product` - The extracted attributes
    /// * `category_id` - The innermost breadcrumb category, if any
    ///
    /// # Returns
    ///
    /// The ID of the product row
    fn insert_product(
        &mut self,
        product: &ProductAttributes,
        category_id: Option<i64>,
    ) -> StorageResult<i64>;

    /// Number of comments stored for a product
    fn count_comments(&self, product_id: i64) -> StorageResult<u64>;

    // ===== Statistics =====

    /// Totals and completion counts for one site
    fn count_by_kind(&self, kind: Site) -> StorageResult<KindCounts>;
}
