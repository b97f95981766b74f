//! Kafka job queue for the search worker.
//!
//! Consumes indexing jobs from a Kafka topic with manual offset commits and
//! publishes failed jobs to a separate topic for inspection and retry.
//!
//! An offset is committed only once every earlier job on its partition has
//! been reported. A failed job whose failure record cannot be published is
//! never acknowledged, so it is redelivered after a restart.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rdkafka::{
    config::ClientConfig,
    consumer::{CommitMode, Consumer, StreamConsumer},
    message::Message as KafkaMessage,
    producer::{FutureProducer, FutureRecord},
    Offset, TopicPartitionList,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use crate::consumer::job_queue::JobQueue;
use crate::consumer::messages::{JobOutcome, QueuePosition, QueuedJob};
use crate::consumer::offset_tracker::OffsetTracker;
use crate::errors::{IngestError, JobError};

/// Default topic indexing jobs are consumed from.
pub const DEFAULT_JOBS_TOPIC: &str = "search_indexing";

/// Default topic failed jobs are published to.
pub const DEFAULT_FAILED_TOPIC: &str = "search_indexing.failed";

/// How long to wait for a failure record to be delivered.
const PRODUCE_TIMEOUT: Duration = Duration::from_secs(5);

/// Attempts at publishing a failure record before the job is left unacknowledged.
const PUBLISH_ATTEMPTS: u32 = 3;

/// Pause between publish attempts, multiplied by the attempt number.
const PUBLISH_BACKOFF: Duration = Duration::from_millis(500);

/// Connection settings for the Kafka job queue.
#[derive(Debug, Clone)]
pub struct KafkaQueueConfig {
    /// Kafka broker addresses (comma-separated).
    pub brokers: String,
    /// Consumer group ID.
    pub group_id: String,
    /// Topic carrying indexing jobs.
    pub jobs_topic: String,
    /// Topic receiving failure records.
    pub failed_topic: String,
}

impl KafkaQueueConfig {
    /// Create a config using the default topic names.
    pub fn new(brokers: impl Into<String>, group_id: impl Into<String>) -> Self {
        Self {
            brokers: brokers.into(),
            group_id: group_id.into(),
            jobs_topic: DEFAULT_JOBS_TOPIC.to_string(),
            failed_topic: DEFAULT_FAILED_TOPIC.to_string(),
        }
    }
}

/// Record published to the failed-jobs topic.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedJobRecord<'a> {
    pub job_id: &'a str,
    pub data: &'a Value,
    pub error: String,
    pub error_kind: &'static str,
    pub failed_at: DateTime<Utc>,
}

impl<'a> FailedJobRecord<'a> {
    pub fn new(job: &'a QueuedJob, error: &JobError) -> Self {
        Self {
            job_id: &job.id,
            data: &job.data,
            error: error.to_string(),
            error_kind: error.kind(),
            failed_at: Utc::now(),
        }
    }
}

/// Kafka-backed job queue.
pub struct KafkaJobQueue {
    consumer: StreamConsumer,
    producer: FutureProducer,
    config: KafkaQueueConfig,
    offsets: Mutex<OffsetTracker>,
}

impl KafkaJobQueue {
    /// Create the consumer and producer and subscribe to the jobs topic.
    ///
    /// # Returns
    ///
    /// * `Ok(KafkaJobQueue)` - A subscribed queue
    /// * `Err(IngestError)` - If the clients cannot be created or subscription fails
    pub fn new(config: KafkaQueueConfig) -> Result<Self, IngestError> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("group.id", &config.group_id)
            .set("enable.auto.commit", "false")
            .set("auto.offset.reset", "earliest")
            .set("session.timeout.ms", "6000")
            .create()
            .map_err(|e| IngestError::kafka(e.to_string()))?;

        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("compression.type", "zstd")
            .set("message.timeout.ms", "5000")
            .create()
            .map_err(|e| IngestError::kafka(e.to_string()))?;

        consumer
            .subscribe(&[config.jobs_topic.as_str()])
            .map_err(|e| IngestError::kafka(e.to_string()))?;

        info!(
            brokers = %config.brokers,
            group_id = %config.group_id,
            jobs_topic = %config.jobs_topic,
            failed_topic = %config.failed_topic,
            "Created Kafka job queue"
        );

        Ok(Self {
            consumer,
            producer,
            config,
            offsets: Mutex::new(OffsetTracker::new()),
        })
    }

    /// Build a job from the parts of a Kafka message.
    ///
    /// Payloads that are not JSON are kept as a JSON string so validation can
    /// report what was received.
    fn job_from_message(
        topic: &str,
        partition: i32,
        offset: i64,
        payload: Option<&[u8]>,
    ) -> QueuedJob {
        let data = match payload {
            None => Value::Null,
            Some(bytes) => serde_json::from_slice(bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned())),
        };

        QueuedJob {
            id: format!("{}/{}/{}", topic, partition, offset),
            data,
            position: Some(QueuePosition {
                topic: topic.to_string(),
                partition,
                offset,
            }),
        }
    }

    /// Publish the failure record, retrying with a linear backoff.
    async fn publish_failure(&self, job: &QueuedJob, error: &JobError) -> Result<(), IngestError> {
        let failure = FailedJobRecord::new(job, error);
        let payload =
            serde_json::to_vec(&failure).map_err(|e| IngestError::serialization(e.to_string()))?;

        let mut attempt = 1;
        loop {
            let record = FutureRecord::to(&self.config.failed_topic)
                .key(job.id.as_str())
                .payload(&payload);

            match self.producer.send(record, PRODUCE_TIMEOUT).await {
                Ok(_) => return Ok(()),
                Err((e, _)) if attempt < PUBLISH_ATTEMPTS => {
                    warn!(attempt, error = %e, "Failed to publish failure record, retrying");
                    tokio::time::sleep(PUBLISH_BACKOFF * attempt).await;
                    attempt += 1;
                }
                Err((e, _)) => {
                    return Err(IngestError::report(format!(
                        "Failed to publish failure record after {} attempts: {}",
                        attempt, e
                    )));
                }
            }
        }
    }

    fn tracker(&self) -> Result<MutexGuard<'_, OffsetTracker>, IngestError> {
        self.offsets
            .lock()
            .map_err(|e| IngestError::consumer(e.to_string()))
    }

    /// Mark the job as finished and commit its partition if the commit point moved.
    fn acknowledge(&self, position: &QueuePosition) -> Result<(), IngestError> {
        let Some(next_offset) = self.tracker()?.finished(position) else {
            debug!(offset = position.offset, "Earlier job still in flight, commit deferred");
            return Ok(());
        };

        let mut tpl = TopicPartitionList::new();
        tpl.add_partition_offset(&position.topic, position.partition, Offset::Offset(next_offset))?;

        self.consumer.commit(&tpl, CommitMode::Async)?;
        Ok(())
    }
}

#[async_trait]
impl JobQueue for KafkaJobQueue {
    async fn next_job(&self) -> Result<Option<QueuedJob>, IngestError> {
        let message = self.consumer.recv().await?;

        let job = Self::job_from_message(
            message.topic(),
            message.partition(),
            message.offset(),
            message.payload(),
        );

        if let Some(position) = &job.position {
            self.tracker()?.started(position);
        }

        debug!(job_id = %job.id, "Received job");
        Ok(Some(job))
    }

    #[instrument(skip(self, job, outcome), fields(job_id = %job.id))]
    async fn report(&self, job: &QueuedJob, outcome: &JobOutcome) -> Result<(), IngestError> {
        if let JobOutcome::Failed(error) = outcome {
            if let Err(e) = self.publish_failure(job, error).await {
                error!(error = %e, "Job left unacknowledged, redelivered after a restart");
                return Err(e);
            }
        }

        match &job.position {
            Some(position) => self.acknowledge(position),
            None => {
                warn!("Job has no queue position, nothing to commit");
                Ok(())
            }
        }
    }
}
