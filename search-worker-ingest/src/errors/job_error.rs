//! Per-job failure types.

use thiserror::Error;

use crate::validator::ValidationError;
use search_worker_repository::SearchIndexError;
use search_worker_store::StoreError;

/// Reasons a single job fails.
///
/// Every variant is reported to the queue as a failed job; the worker never
/// retries on its own.
#[derive(Error, Debug)]
pub enum JobError {
    /// The payload is not a valid indexing request.
    #[error("Malformed job request: {0}")]
    Validation(#[from] ValidationError),

    /// An `index` job named a record that no longer exists.
    #[error("Record {0} not found")]
    NotFound(String),

    /// The record store could not be read.
    #[error("Record store error: {0}")]
    Store(#[from] StoreError),

    /// The search index rejected or failed the mutation.
    #[error("Search index error: {0}")]
    Search(#[from] SearchIndexError),
}

impl JobError {
    /// Create a not found error.
    pub fn not_found(record_id: impl Into<String>) -> Self {
        Self::NotFound(record_id.into())
    }

    /// Short, stable label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            JobError::Validation(_) => "validation",
            JobError::NotFound(_) => "not_found",
            JobError::Store(_) => "store",
            JobError::Search(_) => "search",
        }
    }
}
