//! Mall-Spider main entry point
//!
//! This is the command-line interface for the Mall-Spider e-commerce scraper.

use anyhow::Context;
use clap::Parser;
use mall_spider::config::{load_config_with_hash, Config, DEFAULT_ENVIRONMENT};
use mall_spider::output::{load_statistics, print_statistics};
use mall_spider::storage::open_storage;
use mall_spider::{Site, Spider, Stage};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Mall-Spider: a multi-site e-commerce scraper
///
/// Mall-Spider scrapes a site in four resumable stages: `fetch` stores the
/// root categories, `paginate` expands categories into listing pages, `dig`
/// collects product links and `parse` stores product details. `stats`
/// shows progress.
#[derive(Parser, Debug)]
#[command(name = "mall-spider")]
#[command(version)]
#[command(about = "A multi-site e-commerce scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Stage to run: fetch, paginate, dig, parse or stats
    #[arg(value_name = "STAGE")]
    stage: String,

    /// Site to scrape (dangdang, jingdong, tmall, newegg, suning, gome)
    #[arg(short, long, default_value = "dangdang")]
    site: String,

    /// Environment whose database is used
    #[arg(short, long = "env", env = "SPIDER_ENV", default_value = DEFAULT_ENVIRONMENT)]
    environment: String,

    /// Items to process in this run (overrides `spider.number`)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    number: Option<u32>,

    /// Concurrent downloads (overrides `downloader.concurrency`)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=100))]
    concurrency: Option<u32>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be processed without downloading
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if let Some(number) = cli.number {
        config.spider.number = number;
    }
    if let Some(concurrency) = cli.concurrency {
        config.downloader.concurrency = concurrency;
    }

    if cli.stage.trim().eq_ignore_ascii_case("stats") {
        return handle_stats(&config, &cli.environment);
    }

    let stage: Stage = cli.stage.parse()?;
    let site: Site = cli.site.parse()?;

    if cli.dry_run {
        handle_dry_run(&config, &config_hash, &cli.environment, site, stage)
    } else {
        handle_stage(&config, &config_hash, &cli.environment, site, stage).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("mall_spider=info,warn"),
            1 => EnvFilter::new("mall_spider=debug,info"),
            2 => EnvFilter::new("mall_spider=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be processed
fn handle_dry_run(
    config: &Config,
    config_hash: &str,
    environment: &str,
    site: Site,
    stage: Stage,
) -> anyhow::Result<()> {
    println!("=== Mall-Spider Dry Run ===\n");

    println!("Downloader:");
    println!("  Concurrency: {}", config.downloader.concurrency);
    println!("  Timeout: {}s", config.downloader.timeout_secs);
    println!("  User agent: {}", config.downloader.user_agent);

    println!("\nEnvironment: {}", environment);
    println!("  Database: {}", config.environment(environment)?.database_path);

    println!("\nSite: {} ({})", site, site.encoding());
    println!("Stage: {}", stage);

    let spider = Spider::new(config, config_hash, environment, site)?;
    if stage == Stage::Fetch {
        println!("  Category source: {}", site.fetcher().source_url());
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would process {} item(s) (batch size {})",
        spider.pending(stage)?,
        config.spider.number
    );

    Ok(())
}

/// Handles the `stats` stage: shows progress from the database
fn handle_stats(config: &Config, environment: &str) -> anyhow::Result<()> {
    let database_path = &config.environment(environment)?.database_path;
    println!("Database: {}\n", database_path);

    let storage = open_storage(Path::new(database_path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles one scrape stage
async fn handle_stage(
    config: &Config,
    config_hash: &str,
    environment: &str,
    site: Site,
    stage: Stage,
) -> anyhow::Result<()> {
    tracing::info!(
        "Running {} for {} in {} (batch size {}, concurrency {})",
        stage,
        site,
        environment,
        config.spider.number,
        config.downloader.concurrency
    );

    let mut spider = Spider::new(config, config_hash, environment, site)?;
    let summary = spider.run(stage).await?;

    if summary.failed > 0 {
        tracing::warn!(
            "{} item(s) failed and remain pending; rerun `{}` to retry",
            summary.failed,
            stage
        );
    }

    Ok(())
}
