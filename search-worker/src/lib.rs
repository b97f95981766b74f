//! # Search Worker
//!
//! Main library for the search indexing worker.
//!
//! This crate provides the settings, dependency wiring and error type used
//! by the `search-worker` binary.

pub mod config;

pub use config::{Dependencies, LogFormat, WorkerSettings};

use thiserror::Error;

/// Errors that can occur during worker initialization or execution.
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Record store error.
    #[error("Store error: {0}")]
    StoreError(#[from] search_worker_store::StoreError),

    /// Queue or worker loop error.
    #[error("Ingest error: {0}")]
    IngestError(#[from] search_worker_ingest::IngestError),
}

impl WorkerError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
