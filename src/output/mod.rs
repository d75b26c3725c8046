//! Output module for reporting scrape progress
//!
//! This module handles:
//! - Collecting per-site record counts from storage
//! - Printing progress and recent runs for the `stats` command

pub mod stats;

pub use stats::{load_statistics, print_statistics, ScrapeStatistics, SiteStatistics};
