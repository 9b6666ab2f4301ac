//! feedfinder CLI
//!
//! Local execution entry point.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use feedfinder::{
    error::Result,
    models::Config,
    pipeline::{self, RunOptions},
    storage::{JsonFileCache, RecordStore},
    utils::http::{HttpFetcher, PageFetcher},
};

/// feedfinder - Tech Community blog feed collector
#[derive(Parser, Debug)]
#[command(
    name = "feedfinder",
    version,
    about = "Builds an OPML subscription list of Microsoft Tech Community blogs"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "feedfinder.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full pipeline: cache or discovery, then OPML and README
    Run {
        /// Ignore an existing cache and rebuild it
        #[arg(long)]
        refresh: bool,
    },

    /// Discover and enrich blogs, then save the cache
    Discover,

    /// Write the OPML list and README from the existing cache
    Render,

    /// Validate the configuration
    Validate,

    /// Show resolved paths and cache state
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("feedfinder starting...");

    let mut config = Config::load_or_default(&cli.config);
    config.apply_env();

    if let Err(e) = config.validate() {
        log::error!("Config validation failed: {}", e);
        return Err(e);
    }

    let cache = JsonFileCache::new(&config.paths.cache_file);

    match cli.command.unwrap_or(Command::Run { refresh: false }) {
        Command::Run { refresh } => {
            let summary = pipeline::run_pipeline(&config, RunOptions { refresh }).await?;
            if summary.failures > 0 {
                log::warn!("{} blogs were written without a feed", summary.failures);
            }
        }

        Command::Discover => {
            let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::from_config(&config.http)?);
            let collected = pipeline::collect_records(&config, fetcher, &cache, true).await?;
            log::info!(
                "Saved {} blogs to {}",
                collected.records.len(),
                cache.location()
            );
        }

        Command::Render => {
            let records = pipeline::load_cached(&cache).await?;
            let categories = pipeline::render_outputs(&config, &records).await?;
            log::info!(
                "Rendered {} blogs in {} categories",
                records.len(),
                categories
            );
        }

        Command::Validate => {
            log::info!("✓ Config OK (includes feed pattern and selectors)");
        }

        Command::Info => {
            log::info!("Config file: {}", cli.config.display());
            log::info!("Root page: {}", config.discovery.root_url);
            log::info!(
                "Cache: {} ({})",
                cache.location(),
                match cache.exists().await {
                    Ok(true) => "exists",
                    Ok(false) => "not found",
                    Err(_) => "unreadable",
                }
            );
            log::info!("OPML: {}", config.paths.opml_file.display());
            if config.readme.enabled {
                log::info!(
                    "README: {} -> {}",
                    config.paths.readme_template.display(),
                    config.paths.readme_file.display()
                );
            }
        }
    }

    log::info!("Done!");

    Ok(())
}
