//! Dependency initialization and wiring for the search worker.

use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{redact_credentials, WorkerSettings};
use crate::WorkerError;
use search_worker_ingest::{
    IndexingWorker, JobProcessor, KafkaJobQueue, KafkaQueueConfig, WorkerConfig,
};
use search_worker_repository::{
    IndexConfig, OpenSearchClient, SearchIndexClient, SharedSearchClient,
};
use search_worker_store::SqlRecordStore;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured worker ready to run.
    pub worker: IndexingWorker,
}

impl Dependencies {
    /// Initialize all dependencies from resolved settings.
    ///
    /// A missing `OPENSEARCH_URL` disables search. An unreachable search
    /// backend is only logged here; jobs then fail individually.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(WorkerError)` - If the record store or queue cannot be created
    pub async fn new(settings: &WorkerSettings) -> Result<Self, WorkerError> {
        info!(
            database_url = %redact_credentials(&settings.database_url),
            opensearch_url = %settings
                .opensearch_url
                .as_deref()
                .map(redact_credentials)
                .unwrap_or_else(|| "<disabled>".to_string()),
            opensearch_index = %settings.opensearch_index,
            kafka_broker = %settings.kafka_broker,
            kafka_group_id = %settings.kafka_group_id,
            concurrency = settings.concurrency,
            "Initializing dependencies"
        );

        // Initialize record store
        let store = SqlRecordStore::connect(
            &settings.database_url,
            settings.database_max_connections,
        )
        .await?;
        info!("Record store connected");

        let search = Self::search_client(settings).await;
        info!(search_enabled = search.is_enabled(), "Search client ready");

        // Initialize Kafka queue
        let queue = KafkaJobQueue::new(KafkaQueueConfig {
            jobs_topic: settings.jobs_topic.clone(),
            failed_topic: settings.failed_topic.clone(),
            ..KafkaQueueConfig::new(&settings.kafka_broker, &settings.kafka_group_id)
        })?;

        let processor = JobProcessor::new(Arc::new(search), Arc::new(store));
        let worker = IndexingWorker::with_config(
            Arc::new(queue),
            processor,
            WorkerConfig {
                concurrency: settings.concurrency,
            },
        );

        Ok(Self { worker })
    }

    async fn search_client(settings: &WorkerSettings) -> SharedSearchClient {
        let Some(url) = settings.opensearch_url.as_deref() else {
            info!("OPENSEARCH_URL is not set, search indexing is disabled");
            return SharedSearchClient::disabled();
        };

        let index_config = IndexConfig::new(&settings.opensearch_index);
        let provider = match OpenSearchClient::new(url, index_config) {
            Ok(provider) => provider,
            Err(e) => {
                warn!(error = %e, "Failed to create OpenSearch client, search is disabled");
                return SharedSearchClient::disabled();
            }
        };
        let client = SearchIndexClient::new(Box::new(provider));

        match client.health_check().await {
            Ok(true) => info!("OpenSearch connection verified"),
            Ok(false) => warn!("OpenSearch cluster is unhealthy"),
            Err(e) => warn!(error = %e, "OpenSearch health check failed"),
        }

        if let Err(e) = client.ensure_index().await {
            warn!(error = %e, "Failed to ensure search index exists");
        }

        SharedSearchClient::new(client)
    }
}
