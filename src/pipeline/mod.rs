//! Pipeline stages for building the subscription list.
//!
//! - `collect_records`: Load the cache, or discover and enrich blogs
//! - `render_outputs`: Group records and write the OPML list and README
//! - `run_pipeline`: Both, in order

pub mod enrich;
pub mod group;
pub mod run;

pub use enrich::{EnrichmentFailure, EnrichmentOutcome, EnrichmentPool};
pub use group::group_by_category;
pub use run::{
    CollectedRecords, RunOptions, RunSummary, collect_records, load_cached, render_outputs,
    run_pipeline, run_pipeline_with,
};
