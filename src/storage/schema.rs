//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Mall-Spider database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per stage invocation
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    stage TEXT NOT NULL,
    kind TEXT NOT NULL,
    config_hash TEXT NOT NULL,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    status TEXT NOT NULL
);

-- Category tree; roots come from the fetch stage, deeper levels from breadcrumbs
CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    kind TEXT NOT NULL,
    name TEXT NOT NULL,
    url TEXT NOT NULL UNIQUE,
    parent_id INTEGER REFERENCES categories(id),
    completed INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_categories_kind ON categories(kind);
CREATE INDEX IF NOT EXISTS idx_categories_parent ON categories(parent_id);

-- Listing pages produced by pagination
CREATE TABLE IF NOT EXISTS pages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    kind TEXT NOT NULL,
    url TEXT NOT NULL UNIQUE,
    category_id INTEGER NOT NULL REFERENCES categories(id),
    completed INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_pages_kind_completed ON pages(kind, completed);

-- Product detail URLs dug out of listing pages
CREATE TABLE IF NOT EXISTS product_urls (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    kind TEXT NOT NULL,
    url TEXT NOT NULL UNIQUE,
    page_id INTEGER NOT NULL REFERENCES pages(id),
    completed INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_product_urls_kind_completed ON product_urls(kind, completed);

-- Parsed product details
CREATE TABLE IF NOT EXISTS products (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    kind TEXT NOT NULL,
    product_url_id INTEGER NOT NULL UNIQUE REFERENCES product_urls(id),
    category_id INTEGER REFERENCES categories(id),
    title TEXT,
    price INTEGER,
    price_url TEXT,
    stock INTEGER,
    image_url TEXT,
    description TEXT,
    score INTEGER,
    product_code TEXT,
    standard TEXT,
    end_product TEXT,
    merchant TEXT,
    brand TEXT,
    brand_type TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_products_kind ON products(kind);

CREATE TABLE IF NOT EXISTS comments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    product_id INTEGER NOT NULL REFERENCES products(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    publish_at TEXT NOT NULL,
    star INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_comments_product ON comments(product_id);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)
}
