//! Indexing worker.
//!
//! `JobProcessor` runs one job through validation and dispatch;
//! `IndexingWorker` pulls jobs from the queue, runs them with bounded
//! concurrency, and reports every outcome back to the queue.

use std::sync::Arc;

use tokio::sync::{broadcast, Semaphore};
use tracing::{debug, error, info, instrument, warn};

use crate::consumer::{JobOutcome, JobQueue, QueuedJob};
use crate::dispatcher::{JobDispatcher, JobDisposition};
use crate::errors::{IngestError, JobError};
use crate::validator::validate;
use search_worker_repository::SearchClientProvider;
use search_worker_store::RecordStore;

/// Configuration for the worker loop.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Maximum number of jobs processed at the same time.
    pub concurrency: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self { concurrency: 1 }
    }
}

/// Runs a single job: validate, look up the search client, dispatch.
pub struct JobProcessor {
    search: Arc<dyn SearchClientProvider>,
    dispatcher: JobDispatcher,
}

impl JobProcessor {
    /// Create a processor from the process-wide search client and record store.
    pub fn new(search: Arc<dyn SearchClientProvider>, store: Arc<dyn RecordStore>) -> Self {
        Self {
            search,
            dispatcher: JobDispatcher::new(store),
        }
    }

    /// Process one job and return its outcome.
    ///
    /// Never retries. A missing search client completes the job without
    /// reading the record store.
    pub async fn process(&self, job: &QueuedJob) -> JobOutcome {
        match self.try_process(job).await {
            Ok(disposition) => JobOutcome::Completed(disposition),
            Err(error) => JobOutcome::Failed(error),
        }
    }

    async fn try_process(&self, job: &QueuedJob) -> Result<JobDisposition, JobError> {
        let request = validate(&job.data)?;

        let Some(client) = self.search.get_client().await else {
            debug!(job_id = %job.id, "Search is not configured, nothing to do");
            return Ok(JobDisposition::SearchDisabled);
        };

        self.dispatcher.dispatch(&request, &client).await
    }
}

/// Pulls jobs from a queue and processes them.
///
/// The worker:
/// - Keeps at most `concurrency` jobs in flight
/// - Reports exactly one outcome per job to the queue
/// - Logs exactly one outcome line per job
/// - Stops on ctrl-c, `shutdown()`, or when the queue ends, after in-flight jobs finish
pub struct IndexingWorker {
    queue: Arc<dyn JobQueue>,
    processor: Arc<JobProcessor>,
    config: WorkerConfig,
    shutdown_tx: broadcast::Sender<()>,
}

impl IndexingWorker {
    /// Create a new worker with default configuration.
    pub fn new(queue: Arc<dyn JobQueue>, processor: JobProcessor) -> Self {
        Self::with_config(queue, processor, WorkerConfig::default())
    }

    /// Create a new worker with custom configuration.
    pub fn with_config(
        queue: Arc<dyn JobQueue>,
        processor: JobProcessor,
        config: WorkerConfig,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            queue,
            processor: Arc::new(processor),
            config,
            shutdown_tx,
        }
    }

    /// Run the worker until shutdown or until the queue ends.
    ///
    /// Returns only after every job it started has been processed and reported.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The worker stopped cleanly
    /// * `Err(IngestError)` - If `concurrency` is larger than a semaphore can hold
    #[instrument(skip(self), fields(concurrency = self.config.concurrency))]
    pub async fn run(&self) -> Result<(), IngestError> {
        let concurrency = self.config.concurrency.max(1);
        let drain_permits = u32::try_from(concurrency)
            .ok()
            .filter(|_| concurrency <= Semaphore::MAX_PERMITS)
            .ok_or_else(|| {
                IngestError::consumer(format!("concurrency {} is too large", concurrency))
            })?;

        info!("Starting search indexing worker");

        let permits = Arc::new(Semaphore::new(concurrency));
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        loop {
            let permit = tokio::select! {
                _ = shutdown_rx.recv() => break,
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
                permit = permits.clone().acquire_owned() => {
                    permit.map_err(|e| IngestError::consumer(e.to_string()))?
                }
            };

            let next = tokio::select! {
                _ = shutdown_rx.recv() => break,
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
                next = self.queue.next_job() => next,
            };

            let job = match next {
                Ok(Some(job)) => job,
                Ok(None) => {
                    info!("Job queue ended");
                    break;
                }
                Err(e) => {
                    error!(error = %e, "Failed to receive job");
                    continue;
                }
            };

            let queue = self.queue.clone();
            let processor = self.processor.clone();
            tokio::spawn(async move {
                let outcome = processor.process(&job).await;
                log_outcome(&job, &outcome);

                if let Err(e) = queue.report(&job, &outcome).await {
                    error!(job_id = %job.id, error = %e, "Failed to report job outcome");
                }
                drop(permit);
            });
        }

        // Wait for in-flight jobs to finish and report.
        let _drained = permits
            .acquire_many(drain_permits)
            .await
            .map_err(|e| IngestError::consumer(e.to_string()))?;

        info!("Worker shutdown complete");
        Ok(())
    }

    /// Trigger a graceful shutdown.
    ///
    /// The worker stops pulling jobs and `run` returns once in-flight jobs
    /// have been reported. Has no effect unless `run` is in progress.
    pub fn shutdown(&self) {
        if self.shutdown_tx.send(()).is_err() {
            warn!("Worker is not running");
        }
    }
}

fn log_outcome(job: &QueuedJob, outcome: &JobOutcome) {
    match outcome {
        JobOutcome::Completed(disposition) => {
            info!(job_id = %job.id, disposition = %disposition, "Completed successfully");
        }
        JobOutcome::Failed(error) => {
            error!(job_id = %job.id, kind = error.kind(), error = %error, "Job failed");
        }
    }
}
