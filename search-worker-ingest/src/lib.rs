//! # Search Worker Ingest
//!
//! This crate provides the indexing job consumer: it pulls indexing requests
//! from a queue and applies them to the search index.
//!
//! ## Architecture
//!
//! Each job flows through the same steps:
//!
//! 1. **Consumer**: A `JobQueue` delivers the raw job (Kafka or in-memory)
//! 2. **Validator**: Parses the untyped payload into an `IndexingRequest`
//! 3. **Dispatcher**: Reads the record and upserts it, or deletes it by id
//! 4. **Worker**: Drives the steps, bounds concurrency and reports each outcome

pub mod consumer;
pub mod dispatcher;
pub mod errors;
pub mod validator;
pub mod worker;

pub use consumer::{
    JobOutcome, JobQueue, KafkaJobQueue, KafkaQueueConfig, MemoryJobQueue, QueuedJob,
    ReportedOutcome,
};
pub use dispatcher::{JobDispatcher, JobDisposition};
pub use errors::{IngestError, JobError};
pub use validator::{validate, Received, ValidationError};
pub use worker::{IndexingWorker, JobProcessor, WorkerConfig};
