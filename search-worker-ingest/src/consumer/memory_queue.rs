//! In-memory job queue.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::consumer::job_queue::JobQueue;
use crate::consumer::messages::{JobOutcome, JobReport, QueuedJob, ReportedOutcome};
use crate::errors::IngestError;

/// A FIFO queue held in memory, ending once drained.
///
/// Every reported outcome is kept so callers can inspect them afterwards.
#[derive(Default)]
pub struct MemoryJobQueue {
    jobs: Mutex<VecDeque<QueuedJob>>,
    reports: Mutex<Vec<JobReport>>,
}

impl MemoryJobQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a queue pre-filled with `jobs`.
    pub fn with_jobs(jobs: impl IntoIterator<Item = QueuedJob>) -> Self {
        Self {
            jobs: Mutex::new(jobs.into_iter().collect()),
            reports: Mutex::new(Vec::new()),
        }
    }

    /// Append a job.
    pub fn push(&self, job: QueuedJob) -> Result<(), IngestError> {
        self.jobs
            .lock()
            .map_err(|e| IngestError::consumer(e.to_string()))?
            .push_back(job);
        Ok(())
    }

    /// Outcomes reported so far, in report order.
    pub fn reports(&self) -> Vec<JobReport> {
        self.reports
            .lock()
            .map(|reports| reports.clone())
            .unwrap_or_default()
    }

    /// The reported outcome for `job_id`, if any.
    pub fn outcome_of(&self, job_id: &str) -> Option<ReportedOutcome> {
        self.reports()
            .into_iter()
            .find(|report| report.job_id == job_id)
            .map(|report| report.outcome)
    }
}

#[async_trait]
impl JobQueue for MemoryJobQueue {
    async fn next_job(&self) -> Result<Option<QueuedJob>, IngestError> {
        let mut jobs = self
            .jobs
            .lock()
            .map_err(|e| IngestError::consumer(e.to_string()))?;
        Ok(jobs.pop_front())
    }

    async fn report(&self, job: &QueuedJob, outcome: &JobOutcome) -> Result<(), IngestError> {
        self.reports
            .lock()
            .map_err(|e| IngestError::report(e.to_string()))?
            .push(JobReport {
                job_id: job.id.clone(),
                outcome: ReportedOutcome::from(outcome),
            });
        Ok(())
    }
}
