//! Error types for the search worker ingest.

mod ingest_error;
mod job_error;

pub use ingest_error::IngestError;
pub use job_error::JobError;
