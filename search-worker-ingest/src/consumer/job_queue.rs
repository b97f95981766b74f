//! Queue contract consumed by the indexing worker.

use async_trait::async_trait;

use crate::consumer::messages::{JobOutcome, QueuedJob};
use crate::errors::IngestError;

/// A durable work queue delivering indexing jobs.
///
/// The queue owns persistence, delivery and retry scheduling. The worker only
/// pulls jobs and reports exactly one outcome per delivered job.
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Wait for the next job.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(QueuedJob))` - The next job to process
    /// * `Ok(None)` - The queue has ended and no more jobs will arrive
    /// * `Err(IngestError)` - A transient receive failure; the caller may try again
    async fn next_job(&self) -> Result<Option<QueuedJob>, IngestError>;

    /// Report the outcome of a job previously returned by `next_job`.
    async fn report(&self, job: &QueuedJob, outcome: &JobOutcome) -> Result<(), IngestError>;
}
