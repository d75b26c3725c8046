//! Stage runner
//!
//! A [`Spider`] scrapes one site into one environment's database. Each
//! stage reads a batch of uncompleted records, downloads them, extracts
//! the next level of records and marks the batch items completed. Items
//! that fail are logged and stay pending, so rerunning a stage resumes
//! where the previous run stopped.

use crate::config::Config;
use crate::crawler::{Downloader, Stage};
use crate::digger::Digger;
use crate::document::Document;
use crate::paginater::Paginater;
use crate::parser::{Category, Parser};
use crate::site::Site;
use crate::storage::{
    open_storage, CategoryRecord, PageRecord, ProductUrlRecord, RunStatus, SqliteStorage, Storage,
};
use crate::Result;
use futures::StreamExt;
use std::fmt;
use std::path::Path;
use std::pin::pin;
use std::time::Instant;

/// Outcome of one stage run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageSummary {
    /// Items downloaded and handled
    pub processed: usize,
    /// Items left pending because of an error
    pub failed: usize,
    /// Records written for the next stage
    pub saved: usize,
}

impl fmt::Display for StageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} processed, {} failed, {} saved",
            self.processed, self.failed, self.saved
        )
    }
}

/// Scrapes one site, one stage at a time
pub struct Spider {
    site: Site,
    number: u32,
    config_hash: String,
    downloader: Downloader,
    storage: SqliteStorage,
}

impl Spider {
    /// Creates a spider for `site` writing to the database of `environment`
    ///
    /// # Arguments
    ///
    /// * `config` - The loaded configuration
    /// * `config_hash` - Hash of the configuration file, recorded on each run
    /// * `environment` - Name of the `[environments.*]` entry to use
    /// * `site` - The site to scrape
    ///
    /// # Returns
    ///
    /// * `Ok(Spider)` - Storage opened and HTTP client built
    /// * `Err(SpiderError)` - Unknown environment, unusable database or client
    pub fn new(config: &Config, config_hash: &str, environment: &str, site: Site) -> Result<Self> {
        let database_path = &config.environment(environment)?.database_path;
        let storage = open_storage(Path::new(database_path))?;
        let downloader = Downloader::new(&config.downloader, site)?;

        tracing::debug!(
            "Spider for {} using database {} ({} items per batch)",
            site,
            database_path,
            config.spider.number
        );

        Ok(Self {
            site,
            number: config.spider.number,
            config_hash: config_hash.to_string(),
            downloader,
            storage,
        })
    }

    pub fn site(&self) -> Site {
        self.site
    }

    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    /// Runs `stage` and records it in the runs table
    pub async fn run(&mut self, stage: Stage) -> Result<StageSummary> {
        let run_id = self
            .storage
            .create_run(stage.as_str(), self.site, &self.config_hash)?;
        tracing::info!("Starting {} run {} for {}", stage, run_id, self.site);
        let start_time = Instant::now();

        let result = match stage {
            Stage::Fetch => {
                let source_url = self.site.fetcher().source_url();
                self.fetch(source_url).await
            }
            Stage::Paginate => self.paginate().await,
            Stage::Dig => self.dig().await,
            Stage::Parse => self.parse().await,
        };

        match &result {
            Ok(summary) => {
                self.storage.finish_run(run_id, RunStatus::Completed)?;
                tracing::info!(
                    "Finished {} for {} in {:?}: {}",
                    stage,
                    self.site,
                    start_time.elapsed(),
                    summary
                );
            }
            Err(e) => {
                self.storage.finish_run(run_id, RunStatus::Failed)?;
                tracing::error!("{} for {} failed: {}", stage, self.site, e);
            }
        }

        result
    }

    /// Number of items the next run of `stage` would process
    pub fn pending(&self, stage: Stage) -> Result<usize> {
        let count = match stage {
            Stage::Fetch => 1,
            Stage::Paginate => self
                .storage
                .pending_leaf_categories(self.site, self.number)?
                .len(),
            Stage::Dig => self.storage.pending_pages(self.site, self.number)?.len(),
            Stage::Parse => self
                .storage
                .pending_product_urls(self.site, self.number)?
                .len(),
        };
        Ok(count)
    }

    /// Downloads the category source at `source_url` and stores its root categories
    pub async fn fetch(&mut self, source_url: &str) -> Result<StageSummary> {
        let body = self.downloader.fetch_text(source_url).await?;
        let categories = self.site.fetcher().category_list(&body)?;

        for category in &categories {
            self.storage
                .insert_or_get_category(self.site, &category.name, &category.url)?;
            tracing::info!("Saved Category: {} {}", category.name, category.url);
        }

        Ok(StageSummary {
            processed: 1,
            failed: 0,
            saved: categories.len(),
        })
    }

    /// Turns pending leaf categories into listing pages
    pub async fn paginate(&mut self) -> Result<StageSummary> {
        let categories = self
            .storage
            .pending_leaf_categories(self.site, self.number)?;
        tracing::info!("{} categories to paginate", categories.len());

        let paginater = self.site.paginater();
        let mut summary = StageSummary::default();
        let mut downloads = pin!(self.downloader.download_all(categories));

        while let Some((category, body)) = downloads.next().await {
            let saved = body.and_then(|html| {
                save_pages(&mut self.storage, paginater.as_ref(), &category, &html)
            });
            tally(&mut summary, &category.url, saved);
        }

        Ok(summary)
    }

    /// Turns pending listing pages into product URLs
    pub async fn dig(&mut self) -> Result<StageSummary> {
        let pages = self.storage.pending_pages(self.site, self.number)?;
        tracing::info!("{} pages to dig", pages.len());

        let digger = self.site.digger();
        let mut summary = StageSummary::default();
        let mut downloads = pin!(self.downloader.download_all(pages));

        while let Some((page, body)) = downloads.next().await {
            let saved = body
                .and_then(|html| save_product_urls(&mut self.storage, digger.as_ref(), &page, &html));
            tally(&mut summary, &page.url, saved);
        }

        Ok(summary)
    }

    /// Turns pending product URLs into products
    pub async fn parse(&mut self) -> Result<StageSummary> {
        let product_urls = self.storage.pending_product_urls(self.site, self.number)?;
        tracing::info!("{} products to parse", product_urls.len());

        let parser = self.site.parser();
        let mut summary = StageSummary::default();
        let mut downloads = pin!(self.downloader.download_all(product_urls));

        while let Some((product_url, body)) = downloads.next().await {
            let saved = body.and_then(|html| {
                save_product(&mut self.storage, parser.as_ref(), &product_url, &html).map(|_| 1)
            });
            tally(&mut summary, &product_url.url, saved);
        }

        Ok(summary)
    }
}

fn tally(summary: &mut StageSummary, url: &str, saved: Result<usize>) {
    match saved {
        Ok(count) => {
            summary.processed += 1;
            summary.saved += count;
        }
        Err(e) => {
            summary.failed += 1;
            tracing::error!("Error processing {}: {}", url, e);
        }
    }
}

fn save_pages(
    storage: &mut SqliteStorage,
    paginater: &dyn Paginater,
    category: &CategoryRecord,
    html: &str,
) -> Result<usize> {
    let urls = paginater.pagination_list(&category.url, &Document::parse(html));
    if urls.is_empty() {
        tracing::warn!("No pages found for category {}", category.url);
    }

    for url in &urls {
        storage.insert_or_get_page(category.kind, category.id, url)?;
        tracing::info!("Saved Page URL: {}", url);
    }
    storage.complete_category(category.id)?;

    Ok(urls.len())
}

fn save_product_urls(
    storage: &mut SqliteStorage,
    digger: &dyn Digger,
    page: &PageRecord,
    html: &str,
) -> Result<usize> {
    let urls = digger.product_list(&page.url, &Document::parse(html));
    if urls.is_empty() {
        tracing::warn!("No products found on page {}", page.url);
    }

    for url in &urls {
        storage.insert_or_get_product_url(page.kind, page.id, url)?;
        tracing::info!("Saved Product URL: {}", url);
    }
    storage.complete_page(page.id)?;

    Ok(urls.len())
}

fn save_product(
    storage: &mut SqliteStorage,
    parser: &dyn Parser,
    product_url: &ProductUrlRecord,
    html: &str,
) -> Result<i64> {
    let attributes = parser.attributes(&Document::parse(html), product_url.id);
    if attributes.title.is_none() {
        tracing::debug!("No title found on {}", product_url.url);
    }

    let category_id = link_categories(storage, product_url.kind, &attributes.belongs_to_categories)?;
    let product_id = storage.insert_product(&attributes, category_id)?;
    storage.complete_product_url(product_url.id)?;
    tracing::info!(
        "Saved Product: {} {}",
        attributes.title.as_deref().unwrap_or("-"),
        product_url.url
    );

    Ok(product_id)
}

/// Stores a breadcrumb trail, each entry a child of the one before it
///
/// Returns the innermost category.
fn link_categories(
    storage: &mut SqliteStorage,
    kind: Site,
    categories: &[Category],
) -> Result<Option<i64>> {
    let mut parent_id = None;
    for category in categories {
        let category_id = storage.insert_or_get_category(kind, &category.name, &category.url)?;
        if let Some(parent_id) = parent_id {
            storage.set_category_parent(category_id, parent_id)?;
        }
        parent_id = Some(category_id);
    }
    Ok(parent_id)
}
