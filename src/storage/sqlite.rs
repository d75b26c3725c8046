//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::parser::ProductAttributes;
use crate::site::Site;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{
    CategoryRecord, KindCounts, PageRecord, ProductUrlRecord, RunRecord, RunStatus,
};
use crate::SpiderError;
use chrono::Utc;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};
use std::path::Path;

/// Comment timestamps are stored without a zone, as scraped
const PUBLISH_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

impl ToSql for Site {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Site {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: SpiderError| FromSqlError::Other(Box::new(e)))
    }
}

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens or creates the database at `path`
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(SpiderError)` - Failed to open database
    pub fn new(path: &Path) -> crate::Result<Self> {
        let conn = Connection::open(path).map_err(StorageError::from)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )
        .map_err(StorageError::from)?;

        initialize_schema(&conn).map_err(StorageError::from)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> crate::Result<Self> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(StorageError::from)?;
        initialize_schema(&conn).map_err(StorageError::from)?;
        Ok(Self { conn })
    }

    fn count(&self, sql: &str, kind: Site) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(sql, params![kind], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Sets `completed = 1` on one row, failing if the row does not exist
    fn mark_completed(&mut self, table: &str, id: i64) -> StorageResult<()> {
        let updated = self.conn.execute(
            &format!("UPDATE {} SET completed = 1 WHERE id = ?1", table),
            params![id],
        )?;
        if updated == 0 {
            return Err(StorageError::NotFound(format!("{} ID {}", table, id)));
        }
        Ok(())
    }
}

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<CategoryRecord> {
    Ok(CategoryRecord {
        id: row.get(0)?,
        kind: row.get(1)?,
        name: row.get(2)?,
        url: row.get(3)?,
        parent_id: row.get(4)?,
        completed: row.get(5)?,
    })
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        stage: row.get(1)?,
        kind: row.get(2)?,
        config_hash: row.get(3)?,
        started_at: row.get(4)?,
        finished_at: row.get(5)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(6)?)
            .unwrap_or(RunStatus::Running),
    })
}

impl Storage for SqliteStorage {
    // ===== Run Management =====

    fn create_run(&mut self, stage: &str, kind: Site, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (stage, kind, config_hash, started_at, status) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![stage, kind, config_hash, now, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn finish_run(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2 WHERE id = ?3",
            params![status.to_db_string(), now, run_id],
        )?;
        if updated == 0 {
            return Err(StorageError::NotFound(format!("Run ID {}", run_id)));
        }
        Ok(())
    }

    fn latest_runs(&self, limit: u32) -> StorageResult<Vec<RunRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, stage, kind, config_hash, started_at, finished_at, status
             FROM runs ORDER BY id DESC LIMIT ?1",
        )?;

        let runs = stmt
            .query_map(params![limit], run_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(runs)
    }

    // ===== Categories =====

    fn insert_or_get_category(&mut self, kind: Site, name: &str, url: &str) -> StorageResult<i64> {
        let existing: Option<i64> = self
            .conn
            .query_row("SELECT id FROM categories WHERE url = ?1", params![url], |row| {
                row.get(0)
            })
            .optional()?;

        if let Some(id) = existing {
            return Ok(id);
        }

        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO categories (kind, name, url, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![kind, name, url, now],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_category(&self, category_id: i64) -> StorageResult<CategoryRecord> {
        self.conn
            .query_row(
                "SELECT id, kind, name, url, parent_id, completed FROM categories WHERE id = ?1",
                params![category_id],
                category_from_row,
            )
            .optional()?
            .ok_or_else(|| StorageError::NotFound(format!("Category ID {}", category_id)))
    }

    fn set_category_parent(&mut self, category_id: i64, parent_id: i64) -> StorageResult<()> {
        // A breadcrumb that repeats a link must not make a category its own parent
        if category_id == parent_id {
            return Ok(());
        }

        let updated = self.conn.execute(
            "UPDATE categories SET parent_id = ?1 WHERE id = ?2",
            params![parent_id, category_id],
        )?;
        if updated == 0 {
            return Err(StorageError::NotFound(format!("Category ID {}", category_id)));
        }
        Ok(())
    }

    fn pending_leaf_categories(
        &self,
        kind: Site,
        limit: u32,
    ) -> StorageResult<Vec<CategoryRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT c.id, c.kind, c.name, c.url, c.parent_id, c.completed
             FROM categories c
             WHERE c.kind = ?1 AND c.completed = 0
               AND NOT EXISTS (SELECT 1 FROM categories child WHERE child.parent_id = c.id)
             ORDER BY c.id LIMIT ?2",
        )?;

        let categories = stmt
            .query_map(params![kind, limit], category_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(categories)
    }

    fn complete_category(&mut self, category_id: i64) -> StorageResult<()> {
        self.mark_completed("categories", category_id)
    }

    // ===== Listing Pages =====

    fn insert_or_get_page(
        &mut self,
        kind: Site,
        category_id: i64,
        url: &str,
    ) -> StorageResult<i64> {
        let existing: Option<i64> = self
            .conn
            .query_row("SELECT id FROM pages WHERE url = ?1", params![url], |row| {
                row.get(0)
            })
            .optional()?;

        if let Some(id) = existing {
            return Ok(id);
        }

        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO pages (kind, url, category_id, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![kind, url, category_id, now],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn pending_pages(&self, kind: Site, limit: u32) -> StorageResult<Vec<PageRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, kind, url, category_id, completed FROM pages
             WHERE kind = ?1 AND completed = 0 ORDER BY id LIMIT ?2",
        )?;

        let pages = stmt
            .query_map(params![kind, limit], |row| {
                Ok(PageRecord {
                    id: row.get(0)?,
                    kind: row.get(1)?,
                    url: row.get(2)?,
                    category_id: row.get(3)?,
                    completed: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(pages)
    }

    fn complete_page(&mut self, page_id: i64) -> StorageResult<()> {
        self.mark_completed("pages", page_id)
    }

    // ===== Product URLs =====

    fn insert_or_get_product_url(
        &mut self,
        kind: Site,
        page_id: i64,
        url: &str,
    ) -> StorageResult<i64> {
        let existing: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM product_urls WHERE url = ?1",
                params![url],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(id) = existing {
            return Ok(id);
        }

        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO product_urls (kind, url, page_id, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![kind, url, page_id, now],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn pending_product_urls(
        &self,
        kind: Site,
        limit: u32,
    ) -> StorageResult<Vec<ProductUrlRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, kind, url, page_id, completed FROM product_urls
             WHERE kind = ?1 AND completed = 0 ORDER BY id LIMIT ?2",
        )?;

        let product_urls = stmt
            .query_map(params![kind, limit], |row| {
                Ok(ProductUrlRecord {
                    id: row.get(0)?,
                    kind: row.get(1)?,
                    url: row.get(2)?,
                    page_id: row.get(3)?,
                    completed: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(product_urls)
    }

    fn complete_product_url(&mut self, product_url_id: i64) -> StorageResult<()> {
        self.mark_completed("product_urls", product_url_id)
    }

    // ===== Products =====

    fn insert_product(
        &mut self,
        product: &ProductAttributes,
        category_id: Option<i64>,
    ) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;

        tx.execute(
            "DELETE FROM comments WHERE product_id IN
             (SELECT id FROM products WHERE product_url_id = ?1)",
            params![product.product_url_id],
        )?;
        tx.execute(
            "DELETE FROM products WHERE product_url_id = ?1",
            params![product.product_url_id],
        )?;

        tx.execute(
            "INSERT INTO products (kind, product_url_id, category_id, title, price, price_url,
             stock, image_url, description, score, product_code, standard, end_product,
             merchant, brand, brand_type, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
            params![
                product.kind,
                product.product_url_id,
                category_id,
                product.title,
                product.price,
                product.price_url,
                product.stock,
                product.image_url,
                product.desc,
                product.score,
                product.product_code,
                product.standard,
                product.end_product,
                product.merchant,
                product.brand,
                product.brand_type,
                now
            ],
        )?;
        let product_id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                "INSERT INTO comments (product_id, position, title, content, publish_at, star)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for (position, comment) in product.comments.iter().enumerate() {
                let position = i64::try_from(position)
                    .map_err(|e| StorageError::Serialization(e.to_string()))?;
                stmt.execute(params![
                    product_id,
                    position,
                    comment.title,
                    comment.content,
                    comment.publish_at.format(PUBLISH_AT_FORMAT).to_string(),
                    comment.star
                ])?;
            }
        }

        tx.commit()?;
        Ok(product_id)
    }

    fn count_comments(&self, product_id: i64) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM comments WHERE product_id = ?1",
            params![product_id],
            |row| row.get(0),
        )?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    // ===== Statistics =====

    fn count_by_kind(&self, kind: Site) -> StorageResult<KindCounts> {
        Ok(KindCounts {
            categories: self.count("SELECT COUNT(*) FROM categories WHERE kind = ?1", kind)?,
            categories_completed: self.count(
                "SELECT COUNT(*) FROM categories WHERE kind = ?1 AND completed = 1",
                kind,
            )?,
            pages: self.count("SELECT COUNT(*) FROM pages WHERE kind = ?1", kind)?,
            pages_completed: self.count(
                "SELECT COUNT(*) FROM pages WHERE kind = ?1 AND completed = 1",
                kind,
            )?,
            product_urls: self.count("SELECT COUNT(*) FROM product_urls WHERE kind = ?1", kind)?,
            product_urls_completed: self.count(
                "SELECT COUNT(*) FROM product_urls WHERE kind = ?1 AND completed = 1",
                kind,
            )?,
            products: self.count("SELECT COUNT(*) FROM products WHERE kind = ?1", kind)?,
        })
    }
}
