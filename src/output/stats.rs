//! Statistics generation from the scrape database
//!
//! This module provides functionality for extracting and displaying
//! scrape progress from the storage layer.

use crate::site::Site;
use crate::storage::{KindCounts, RunRecord, Storage};
use crate::Result;

/// Number of runs shown by `print_statistics`
pub const RECENT_RUNS: u32 = 10;

/// Record counts of one site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteStatistics {
    pub site: Site,
    pub counts: KindCounts,
}

/// Scrape progress summary
#[derive(Debug, Clone)]
pub struct ScrapeStatistics {
    /// Counts for every site with at least one record
    pub sites: Vec<SiteStatistics>,

    /// Most recent runs, newest first
    pub recent_runs: Vec<RunRecord>,
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(ScrapeStatistics)` - Successfully loaded statistics
/// * `Err(SpiderError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn Storage) -> Result<ScrapeStatistics> {
    let mut sites = Vec::new();
    for site in Site::ALL {
        let counts = storage.count_by_kind(site)?;
        if counts != KindCounts::default() {
            sites.push(SiteStatistics { site, counts });
        }
    }

    let recent_runs = storage.latest_runs(RECENT_RUNS)?;

    Ok(ScrapeStatistics { sites, recent_runs })
}

fn percentage(done: u64, total: u64) -> f64 {
    if total > 0 {
        (done as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

fn progress_line(label: &str, done: u64, total: u64) -> String {
    format!(
        "  {:<13} {} / {} completed ({:.1}%)",
        label,
        done,
        total,
        percentage(done, total)
    )
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &ScrapeStatistics) {
    println!("=== Scrape Statistics ===\n");

    if stats.sites.is_empty() {
        println!("No records yet.\n");
    }

    for SiteStatistics { site, counts } in &stats.sites {
        println!("{}:", site);
        println!(
            "{}",
            progress_line("Categories:", counts.categories_completed, counts.categories)
        );
        println!("{}", progress_line("Pages:", counts.pages_completed, counts.pages));
        println!(
            "{}",
            progress_line(
                "Product URLs:",
                counts.product_urls_completed,
                counts.product_urls
            )
        );
        println!("  {:<13} {}", "Products:", counts.products);
        println!();
    }

    if !stats.recent_runs.is_empty() {
        println!("Recent Runs ({}):", stats.recent_runs.len());
        for run in &stats.recent_runs {
            println!(
                "  #{} {} {} [{}] started {} finished {}",
                run.id,
                run.kind,
                run.stage,
                run.status.to_db_string(),
                run.started_at,
                run.finished_at.as_deref().unwrap_or("-")
            );
        }
    }
}
