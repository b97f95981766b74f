//! Job dispatch and the index/delete mutation handlers.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::errors::JobError;
use search_worker_repository::SearchIndexClient;
use search_worker_shared::{IndexDocument, IndexOperation, IndexingRequest};
use search_worker_store::RecordStore;

/// What a completed job did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobDisposition {
    /// The record's document was written to the index.
    Indexed,
    /// The record's document was removed from the index.
    Deleted,
    /// Search is not configured; nothing was done.
    SearchDisabled,
}

impl JobDisposition {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobDisposition::Indexed => "indexed",
            JobDisposition::Deleted => "deleted",
            JobDisposition::SearchDisabled => "search_disabled",
        }
    }
}

impl fmt::Display for JobDisposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Routes validated requests to the index or delete handler.
///
/// Holds the shared record store; the search client is passed per call
/// because it is looked up per job.
pub struct JobDispatcher {
    store: Arc<dyn RecordStore>,
}

impl JobDispatcher {
    /// Create a dispatcher reading records from `store`.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Apply `request` to the search index.
    pub async fn dispatch(
        &self,
        request: &IndexingRequest,
        client: &SearchIndexClient,
    ) -> Result<JobDisposition, JobError> {
        match request.operation() {
            IndexOperation::Index => {
                self.run_index(client, request.record_id()).await?;
                Ok(JobDisposition::Indexed)
            }
            IndexOperation::Delete => {
                self.run_delete(client, request.record_id()).await?;
                Ok(JobDisposition::Deleted)
            }
        }
    }

    /// Rebuild the record's document from the store and upsert it.
    ///
    /// Fails with `JobError::NotFound` without touching the index when the
    /// record no longer exists.
    #[instrument(skip(self, client))]
    pub async fn run_index(
        &self,
        client: &SearchIndexClient,
        record_id: &str,
    ) -> Result<(), JobError> {
        let record = self
            .store
            .find_record_by_id(record_id)
            .await?
            .ok_or_else(|| JobError::not_found(record_id))?;

        let document = IndexDocument::from(record);
        debug!(
            has_link = document.url.is_some(),
            has_content = document.content.is_some(),
            tags = document.tags.len(),
            "Upserting document"
        );

        client.upsert(vec![document]).await?;
        Ok(())
    }

    /// Delete the record's document by id.
    ///
    /// The record store is not consulted, and an id already absent from the
    /// index is not an error.
    #[instrument(skip(self, client))]
    pub async fn run_delete(
        &self,
        client: &SearchIndexClient,
        record_id: &str,
    ) -> Result<(), JobError> {
        client.delete(record_id).await?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use search_worker_repository::{SearchIndexError, SearchIndexProvider};
    use search_worker_shared::{LinkDetails, RecordProjection};
    use search_worker_store::StoreError;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Mock record store with a fixed set of records.
    #[derive(Default)]
    pub(crate) struct MockRecordStore {
        pub records: HashMap<String, RecordProjection>,
        pub reads: AtomicUsize,
    }

    impl MockRecordStore {
        pub fn with_records(records: Vec<RecordProjection>) -> Self {
            Self {
                records: records.into_iter().map(|r| (r.id.clone(), r)).collect(),
                reads: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl RecordStore for MockRecordStore {
        async fn find_record_by_id(
            &self,
            id: &str,
        ) -> Result<Option<RecordProjection>, StoreError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(self.records.get(id).cloned())
        }
    }

    /// Calls seen by a `MockSearchProvider`.
    #[derive(Default)]
    pub(crate) struct SearchCalls {
        pub upserts: Mutex<Vec<Vec<IndexDocument>>>,
        pub deletes: Mutex<Vec<String>>,
        pub indexed: Mutex<HashSet<String>>,
    }

    /// Mock search provider that records every call.
    ///
    /// Deletes of ids that are not in the index raise `DocumentNotFound`, like
    /// backends that are strict about missing keys.
    pub(crate) struct MockSearchProvider {
        calls: Arc<SearchCalls>,
    }

    #[async_trait]
    impl SearchIndexProvider for MockSearchProvider {
        async fn upsert_documents(
            &self,
            documents: &[IndexDocument],
        ) -> Result<(), SearchIndexError> {
            let mut indexed = self.calls.indexed.lock().unwrap();
            for document in documents {
                indexed.insert(document.id.clone());
            }
            self.calls.upserts.lock().unwrap().push(documents.to_vec());
            Ok(())
        }

        async fn delete_document(&self, document_id: &str) -> Result<(), SearchIndexError> {
            self.calls.deletes.lock().unwrap().push(document_id.to_string());
            if self.calls.indexed.lock().unwrap().remove(document_id) {
                Ok(())
            } else {
                Err(SearchIndexError::document_not_found(document_id))
            }
        }

        async fn ensure_index_exists(&self) -> Result<(), SearchIndexError> {
            Ok(())
        }

        async fn health_check(&self) -> Result<bool, SearchIndexError> {
            Ok(true)
        }
    }

    pub(crate) fn mock_client() -> (SearchIndexClient, Arc<SearchCalls>) {
        let calls = Arc::new(SearchCalls::default());
        let provider = MockSearchProvider {
            calls: calls.clone(),
        };
        (SearchIndexClient::new(Box::new(provider)), calls)
    }

    pub(crate) fn link_record() -> RecordProjection {
        RecordProjection::new("b1", "owner-1")
            .with_link(LinkDetails {
                url: "https://x".to_string(),
                title: Some("X".to_string()),
                description: Some("d".to_string()),
            })
            .with_tags(["a", "b"])
    }

    #[tokio::test]
    async fn test_dispatch_index() {
        let store = Arc::new(MockRecordStore::with_records(vec![link_record()]));
        let dispatcher = JobDispatcher::new(store.clone());
        let (client, calls) = mock_client();

        let disposition = dispatcher
            .dispatch(&IndexingRequest::index("b1"), &client)
            .await
            .unwrap();

        assert_eq!(disposition, JobDisposition::Indexed);
        assert_eq!(store.reads.load(Ordering::SeqCst), 1);
        let upserts = calls.upserts.lock().unwrap();
        assert_eq!(upserts.len(), 1);
        assert_eq!(upserts[0], vec![IndexDocument::from(link_record())]);
        assert!(calls.deletes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_delete_skips_store() {
        let store = Arc::new(MockRecordStore::default());
        let dispatcher = JobDispatcher::new(store.clone());
        let (client, calls) = mock_client();

        let disposition = dispatcher
            .dispatch(&IndexingRequest::delete("b3"), &client)
            .await
            .unwrap();

        assert_eq!(disposition, JobDisposition::Deleted);
        assert_eq!(store.reads.load(Ordering::SeqCst), 0);
        assert_eq!(*calls.deletes.lock().unwrap(), vec!["b3".to_string()]);
        assert!(calls.upserts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_index_missing_record() {
        let dispatcher = JobDispatcher::new(Arc::new(MockRecordStore::default()));
        let (client, calls) = mock_client();

        let err = dispatcher.run_index(&client, "gone").await.unwrap_err();

        assert!(matches!(err, JobError::NotFound(ref id) if id == "gone"));
        assert!(calls.upserts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_index_is_idempotent() {
        let dispatcher = JobDispatcher::new(Arc::new(MockRecordStore::with_records(vec![
            link_record(),
        ])));
        let (client, calls) = mock_client();

        dispatcher.run_index(&client, "b1").await.unwrap();
        dispatcher.run_index(&client, "b1").await.unwrap();

        let upserts = calls.upserts.lock().unwrap();
        assert_eq!(upserts.len(), 2);
        assert_eq!(upserts[0], upserts[1]);
    }

    #[tokio::test]
    async fn test_run_delete_twice() {
        let dispatcher = JobDispatcher::new(Arc::new(MockRecordStore::default()));
        let (client, calls) = mock_client();
        client.upsert(vec![IndexDocument::new("b3", "owner-1")]).await.unwrap();

        dispatcher.run_delete(&client, "b3").await.unwrap();
        dispatcher.run_delete(&client, "b3").await.unwrap();

        assert_eq!(calls.deletes.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_disposition_labels() {
        assert_eq!(JobDisposition::Indexed.to_string(), "indexed");
        assert_eq!(JobDisposition::SearchDisabled.as_str(), "search_disabled");
    }
}
