// src/pipeline/enrich.rs

//! Bounded worker pool running the enricher over every record.
//!
//! Jobs carry the record itself, so each record is owned by exactly one
//! worker while it is being enriched and no record needs a lock. Finished
//! records are put back at their original index.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;

use crate::error::{AppError, Result};
use crate::models::{EnrichmentConfig, FailurePolicy, FeedRecord};
use crate::services::FeedEnricher;

/// One record waiting for enrichment.
struct Job {
    index: usize,
    record: FeedRecord,
}

/// A record that failed to enrich under `FailurePolicy::Skip`.
#[derive(Debug, Clone)]
pub struct EnrichmentFailure {
    pub index: usize,
    pub url: String,
    pub message: String,
}

/// Result of a pool run.
#[derive(Debug, Default)]
pub struct EnrichmentOutcome {
    /// Records in input order
    pub records: Vec<FeedRecord>,
    /// Records left unenriched, only populated under `FailurePolicy::Skip`
    pub failures: Vec<EnrichmentFailure>,
}

/// What one worker handed back when its queue ran dry.
#[derive(Default)]
struct WorkerReport {
    done: Vec<(usize, FeedRecord)>,
    failures: Vec<EnrichmentFailure>,
}

/// Fixed-size pool of enrichment workers fed by a bounded queue.
#[derive(Debug, Clone)]
pub struct EnrichmentPool {
    workers: usize,
    queue_depth: usize,
    on_failure: FailurePolicy,
}

impl EnrichmentPool {
    pub fn new(workers: usize, queue_depth: usize, on_failure: FailurePolicy) -> Self {
        Self {
            workers: workers.max(1),
            queue_depth: queue_depth.max(1),
            on_failure,
        }
    }

    pub fn from_config(config: &EnrichmentConfig) -> Self {
        Self::new(config.workers, config.queue_depth(), config.on_failure)
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn queue_depth(&self) -> usize {
        self.queue_depth
    }

    /// Enrich every record and return them in input order.
    ///
    /// Returns once every worker has finished. Under `FailurePolicy::Abort`
    /// the first failure cancels the remaining workers, including any blocked
    /// on a slow page, and is returned.
    pub async fn run(
        &self,
        enricher: Arc<FeedEnricher>,
        records: Vec<FeedRecord>,
    ) -> Result<EnrichmentOutcome> {
        let total = records.len();
        let (tx, rx) = mpsc::channel::<Job>(self.queue_depth);
        let rx = Arc::new(Mutex::new(rx));
        let halted = Arc::new(AtomicBool::new(false));

        let mut workers = JoinSet::new();
        for worker_id in 0..self.workers {
            workers.spawn(worker_loop(
                worker_id,
                Arc::clone(&rx),
                Arc::clone(&enricher),
                Arc::clone(&halted),
                self.on_failure,
            ));
        }
        drop(rx);

        // Fed from its own task so a failure is seen while sends are blocked.
        let producer = tokio::spawn(async move {
            for (index, record) in records.into_iter().enumerate() {
                if tx.send(Job { index, record }).await.is_err() {
                    // Every worker has exited, which only happens after a halt.
                    break;
                }
            }
        });

        log::debug!("Waiting for {} workers to complete.", self.workers);

        let mut slots: Vec<Option<FeedRecord>> = vec![None; total];
        let mut failures = Vec::new();
        while let Some(joined) = workers.join_next().await {
            let report = match joined {
                Ok(Ok(report)) => report,
                Ok(Err(e)) => {
                    producer.abort();
                    workers.abort_all();
                    return Err(e);
                }
                Err(e) => {
                    producer.abort();
                    workers.abort_all();
                    return Err(AppError::Worker(e.to_string()));
                }
            };

            for (index, record) in report.done {
                slots[index] = Some(record);
            }
            failures.extend(report.failures);
        }

        log::debug!("Workers done.");

        let records = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.ok_or_else(|| {
                    AppError::Worker(format!("record {index} was never processed"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        failures.sort_by_key(|f| f.index);
        Ok(EnrichmentOutcome { records, failures })
    }
}

async fn worker_loop(
    worker_id: usize,
    rx: Arc<Mutex<mpsc::Receiver<Job>>>,
    enricher: Arc<FeedEnricher>,
    halted: Arc<AtomicBool>,
    on_failure: FailurePolicy,
) -> Result<WorkerReport> {
    let mut report = WorkerReport::default();

    loop {
        let next = {
            let mut rx = rx.lock().await;
            if halted.load(Ordering::SeqCst) {
                break;
            }
            rx.recv().await
        };
        let Some(Job { index, mut record }) = next else {
            break;
        };
        if halted.load(Ordering::SeqCst) {
            break;
        }

        log::debug!(
            "Worker {worker_id} index {index} is blog name:{} url:{} START",
            record.name,
            record.url
        );

        match enricher.enrich(&mut record).await {
            Ok(()) => {}
            Err(e) if on_failure == FailurePolicy::Skip => {
                log::warn!("Skipping {} ({}): {}", record.name, record.url, e);
                report.failures.push(EnrichmentFailure {
                    index,
                    url: record.url.clone(),
                    message: e.to_string(),
                });
            }
            Err(e) => {
                log::error!("Enrichment failed for {}: {}", record.url, e);
                halted.store(true, Ordering::SeqCst);
                return Err(e);
            }
        }

        log::debug!(
            "Worker {worker_id} index {index} is blog name:{} url:{} END",
            record.name,
            record.url
        );
        report.done.push((index, record));
    }

    Ok(report)
}
