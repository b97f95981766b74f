//! Consumer module for the search worker ingest.
//!
//! Defines the queue contract the worker consumes from, plus Kafka and
//! in-memory implementations.

mod job_queue;
mod kafka_queue;
mod memory_queue;
mod messages;
mod offset_tracker;

pub use job_queue::JobQueue;
pub use kafka_queue::{
    FailedJobRecord, KafkaJobQueue, KafkaQueueConfig, DEFAULT_FAILED_TOPIC, DEFAULT_JOBS_TOPIC,
};
pub use memory_queue::MemoryJobQueue;
pub use messages::{JobOutcome, JobReport, QueuePosition, QueuedJob, ReportedOutcome};
pub use offset_tracker::OffsetTracker;
