// src/pipeline/run.rs

//! End-to-end pipeline: records from cache or discovery, then outputs.

use std::sync::Arc;

use chrono::Utc;

use crate::error::{AppError, Result};
use crate::models::{Config, FeedRecord};
use crate::services::{BlogDirectory, FeedEnricher, OpmlWriter, ReadmeWriter};
use crate::storage::{JsonFileCache, RecordStore};
use crate::utils::http::{HttpFetcher, PageFetcher};

use super::enrich::{EnrichmentFailure, EnrichmentPool};
use super::group::group_by_category;

/// Options for a pipeline run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Rebuild the cache even if one exists
    pub refresh: bool,
}

/// Records gathered for a run.
#[derive(Debug, Default)]
pub struct CollectedRecords {
    pub records: Vec<FeedRecord>,
    /// Whether the records came from the cache
    pub from_cache: bool,
    pub failures: Vec<EnrichmentFailure>,
}

/// What a full run produced.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub records: usize,
    pub categories: usize,
    pub from_cache: bool,
    pub failures: usize,
}

/// Run the full pipeline with the HTTP fetcher and JSON cache from `config`.
pub async fn run_pipeline(config: &Config, options: RunOptions) -> Result<RunSummary> {
    let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::from_config(&config.http)?);
    let cache = JsonFileCache::new(&config.paths.cache_file);
    run_pipeline_with(config, fetcher, &cache, options).await
}

/// Run the full pipeline against the given fetcher and cache.
pub async fn run_pipeline_with(
    config: &Config,
    fetcher: Arc<dyn PageFetcher>,
    cache: &dyn RecordStore,
    options: RunOptions,
) -> Result<RunSummary> {
    let start_time = Utc::now();

    let collected = collect_records(config, fetcher, cache, options.refresh).await?;
    let categories = render_outputs(config, &collected.records).await?;

    let elapsed = Utc::now() - start_time;
    log::info!(
        "Pipeline complete: {} blogs in {} categories ({} ms)",
        collected.records.len(),
        categories,
        elapsed.num_milliseconds()
    );

    Ok(RunSummary {
        records: collected.records.len(),
        categories,
        from_cache: collected.from_cache,
        failures: collected.failures.len(),
    })
}

/// Load records from `cache`, or discover and enrich them and save the cache.
///
/// An existing cache is used verbatim unless `refresh` is set.
pub async fn collect_records(
    config: &Config,
    fetcher: Arc<dyn PageFetcher>,
    cache: &dyn RecordStore,
    refresh: bool,
) -> Result<CollectedRecords> {
    if !refresh && cache.exists().await? {
        log::info!("Found a cache list at {}. Using that...", cache.location());
        let records = cache.load().await?;
        return Ok(CollectedRecords {
            records,
            from_cache: true,
            failures: Vec::new(),
        });
    }

    if refresh {
        log::info!("Refresh requested. Rebuilding {}.", cache.location());
    } else {
        log::info!("Could not find the cache list. Generating a new one.");
    }

    let records = {
        let directory = BlogDirectory::new(fetcher.as_ref(), &config.discovery)?;
        directory.discover(&config.discovery.root_url).await?
    };
    log::info!("Discovered {} blogs", records.len());

    let enricher = Arc::new(FeedEnricher::new(fetcher, &config.enrichment)?);
    let pool = EnrichmentPool::from_config(&config.enrichment);
    log::info!(
        "Enriching with {} workers (queue depth {})",
        pool.workers(),
        pool.queue_depth()
    );
    let outcome = pool.run(enricher, records).await?;

    if !outcome.failures.is_empty() {
        log::warn!(
            "{} blogs could not be enriched and were cached without a feed. \
             Run with --refresh to retry them.",
            outcome.failures.len()
        );
    }

    cache.save(&outcome.records).await?;

    Ok(CollectedRecords {
        records: outcome.records,
        from_cache: false,
        failures: outcome.failures,
    })
}

/// Load the cached records, failing when no cache exists.
pub async fn load_cached(cache: &dyn RecordStore) -> Result<Vec<FeedRecord>> {
    if !cache.exists().await? {
        return Err(AppError::cache(cache.location(), "no cache file to render from"));
    }
    cache.load().await
}

/// Group `records` and write the OPML list, plus the README when enabled.
///
/// Returns the number of categories written.
pub async fn render_outputs(config: &Config, records: &[FeedRecord]) -> Result<usize> {
    let groups = group_by_category(records);

    OpmlWriter::new(&config.output)
        .write(&groups, &config.paths.opml_file)
        .await?;

    if config.readme.enabled {
        ReadmeWriter::new(config)
            .write(
                &groups,
                &config.paths.readme_template,
                &config.paths.readme_file,
            )
            .await?;
    } else {
        log::debug!("README output disabled");
    }

    Ok(groups.len())
}
