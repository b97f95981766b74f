//! Message types for the consumer.
//!
//! Defines the jobs and outcomes that flow between the queue and the worker.

use serde_json::Value;

use crate::dispatcher::JobDisposition;
use crate::errors::JobError;

/// Where a job sits in the queue, used to acknowledge it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuePosition {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
}

/// A job delivered by the queue, before validation.
#[derive(Debug, Clone)]
pub struct QueuedJob {
    /// Opaque identifier used for logging and correlation.
    pub id: String,
    /// The untyped job payload.
    pub data: Value,
    /// Queue position, when the queue needs one to acknowledge the job.
    pub position: Option<QueuePosition>,
}

impl QueuedJob {
    /// Create a job without a queue position.
    pub fn new(id: impl Into<String>, data: Value) -> Self {
        Self {
            id: id.into(),
            data,
            position: None,
        }
    }
}

/// Final state of a processed job.
#[derive(Debug)]
pub enum JobOutcome {
    /// The job finished; the disposition says what it did.
    Completed(JobDisposition),
    /// The job failed with the attached error.
    Failed(JobError),
}

/// A cloneable summary of a `JobOutcome`, as stored by a queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportedOutcome {
    Completed(JobDisposition),
    Failed { kind: &'static str, message: String },
}

impl From<&JobOutcome> for ReportedOutcome {
    fn from(outcome: &JobOutcome) -> Self {
        match outcome {
            JobOutcome::Completed(disposition) => ReportedOutcome::Completed(*disposition),
            JobOutcome::Failed(error) => ReportedOutcome::Failed {
                kind: error.kind(),
                message: error.to_string(),
            },
        }
    }
}

/// An outcome reported for a specific job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    pub job_id: String,
    pub outcome: ReportedOutcome,
}
