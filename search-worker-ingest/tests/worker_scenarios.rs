//! End-to-end worker scenarios over an in-memory queue.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use search_worker_ingest::{
    IndexingWorker, JobDisposition, JobProcessor, MemoryJobQueue, QueuedJob, ReportedOutcome,
};
use search_worker_repository::{
    SearchIndexClient, SearchIndexError, SearchIndexProvider, SharedSearchClient,
};
use search_worker_shared::{IndexDocument, LinkDetails, RecordProjection};
use search_worker_store::{RecordStore, StoreError};

#[derive(Default)]
struct FixtureStore {
    records: HashMap<String, RecordProjection>,
    reads: AtomicUsize,
}

impl FixtureStore {
    fn with(records: Vec<RecordProjection>) -> Self {
        Self {
            records: records.into_iter().map(|r| (r.id.clone(), r)).collect(),
            reads: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl RecordStore for FixtureStore {
    async fn find_record_by_id(&self, id: &str) -> Result<Option<RecordProjection>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.get(id).cloned())
    }
}

#[derive(Default)]
struct IndexLog {
    upserts: Mutex<Vec<IndexDocument>>,
    deletes: Mutex<Vec<String>>,
    indexed: Mutex<HashSet<String>>,
}

struct RecordingIndex {
    log: Arc<IndexLog>,
}

#[async_trait]
impl SearchIndexProvider for RecordingIndex {
    async fn upsert_documents(&self, documents: &[IndexDocument]) -> Result<(), SearchIndexError> {
        let mut indexed = self.log.indexed.lock().unwrap();
        for document in documents {
            indexed.insert(document.id.clone());
        }
        self.log.upserts.lock().unwrap().extend_from_slice(documents);
        Ok(())
    }

    async fn delete_document(&self, document_id: &str) -> Result<(), SearchIndexError> {
        self.log.deletes.lock().unwrap().push(document_id.to_string());
        if self.log.indexed.lock().unwrap().remove(document_id) {
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

struct Harness {
    store: Arc<FixtureStore>,
    log: Arc<IndexLog>,
    queue: Arc<MemoryJobQueue>,
}

impl Harness {
    async fn run(records: Vec<RecordProjection>, jobs: Vec<(&str, Value)>) -> Self {
        let log = Arc::new(IndexLog::default());
        let client = SearchIndexClient::new(Box::new(RecordingIndex { log: log.clone() }));
        Self::run_with(records, jobs, SharedSearchClient::new(client), log).await
    }

    async fn run_disabled(records: Vec<RecordProjection>, jobs: Vec<(&str, Value)>) -> Self {
        let log = Arc::new(IndexLog::default());
        Self::run_with(records, jobs, SharedSearchClient::disabled(), log).await
    }

    async fn run_with(
        records: Vec<RecordProjection>,
        jobs: Vec<(&str, Value)>,
        search: SharedSearchClient,
        log: Arc<IndexLog>,
    ) -> Self {
        let store = Arc::new(FixtureStore::with(records));
        let queue = Arc::new(MemoryJobQueue::with_jobs(
            jobs.into_iter().map(|(id, data)| QueuedJob::new(id, data)),
        ));

        let processor = JobProcessor::new(Arc::new(search), store.clone());
        IndexingWorker::new(queue.clone(), processor)
            .run()
            .await
            .unwrap();

        Self { store, log, queue }
    }

    fn reads(&self) -> usize {
        self.store.reads.load(Ordering::SeqCst)
    }

    fn upserts(&self) -> Vec<IndexDocument> {
        self.log.upserts.lock().unwrap().clone()
    }

    fn deletes(&self) -> Vec<String> {
        self.log.deletes.lock().unwrap().clone()
    }
}

fn linked_record() -> RecordProjection {
    RecordProjection::new("b1", "user-1")
        .with_link(LinkDetails {
            url: "https://x".to_string(),
            title: Some("X".to_string()),
            description: Some("d".to_string()),
        })
        .with_tags(["a", "b"])
}

fn text_record() -> RecordProjection {
    RecordProjection::new("b2", "user-2").with_text("hello")
}

#[tokio::test]
async fn test_index_link_record() {
    let harness = Harness::run(
        vec![linked_record()],
        vec![("1", json!({ "recordId": "b1", "operation": "index" }))],
    )
    .await;

    let upserts = harness.upserts();
    assert_eq!(upserts.len(), 1);
    assert_eq!(
        serde_json::to_value(&upserts[0]).unwrap(),
        json!({
            "id": "b1",
            "userId": "user-1",
            "url": "https://x",
            "title": "X",
            "description": "d",
            "tags": ["a", "b"],
        })
    );
    assert_eq!(
        harness.queue.outcome_of("1"),
        Some(ReportedOutcome::Completed(JobDisposition::Indexed))
    );
}

#[tokio::test]
async fn test_index_text_record() {
    let harness = Harness::run(
        vec![text_record()],
        vec![("1", json!({ "recordId": "b2", "operation": "index" }))],
    )
    .await;

    let upserts = harness.upserts();
    assert_eq!(upserts.len(), 1);
    assert_eq!(
        serde_json::to_value(&upserts[0]).unwrap(),
        json!({ "id": "b2", "userId": "user-2", "content": "hello", "tags": [] })
    );
}

#[tokio::test]
async fn test_delete_skips_store() {
    let harness = Harness::run(
        vec![],
        vec![("1", json!({ "recordId": "b3", "operation": "delete" }))],
    )
    .await;

    assert_eq!(harness.deletes(), vec!["b3".to_string()]);
    assert_eq!(harness.reads(), 0);
    assert!(harness.upserts().is_empty());
    assert_eq!(
        harness.queue.outcome_of("1"),
        Some(ReportedOutcome::Completed(JobDisposition::Deleted))
    );
}

#[tokio::test]
async fn test_malformed_request_fails_before_io() {
    let harness = Harness::run(
        vec![linked_record()],
        vec![("1", json!({ "operation": "index" }))],
    )
    .await;

    assert_eq!(harness.reads(), 0);
    assert!(harness.upserts().is_empty());
    assert!(harness.deletes().is_empty());
    match harness.queue.outcome_of("1") {
        Some(ReportedOutcome::Failed { kind, message }) => {
            assert_eq!(kind, "validation");
            assert!(message.contains("recordId"));
        }
        other => panic!("expected validation failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_search_disabled_completes_without_reads() {
    let harness = Harness::run_disabled(
        vec![linked_record()],
        vec![
            ("1", json!({ "recordId": "b1", "operation": "index" })),
            ("2", json!({ "recordId": "b1", "operation": "delete" })),
        ],
    )
    .await;

    assert_eq!(harness.reads(), 0);
    assert_eq!(
        harness.queue.outcome_of("1"),
        Some(ReportedOutcome::Completed(JobDisposition::SearchDisabled))
    );
    assert_eq!(
        harness.queue.outcome_of("2"),
        Some(ReportedOutcome::Completed(JobDisposition::SearchDisabled))
    );
}

#[tokio::test]
async fn test_index_missing_record_fails() {
    let harness = Harness::run(
        vec![],
        vec![("1", json!({ "recordId": "gone", "operation": "index" }))],
    )
    .await;

    assert!(harness.upserts().is_empty());
    assert_eq!(
        harness.queue.outcome_of("1"),
        Some(ReportedOutcome::Failed {
            kind: "not_found",
            message: "Record gone not found".to_string(),
        })
    );
}

#[tokio::test]
async fn test_repeated_jobs_are_idempotent() {
    let harness = Harness::run(
        vec![linked_record()],
        vec![
            ("1", json!({ "recordId": "b1", "operation": "index" })),
            ("2", json!({ "recordId": "b1", "operation": "index" })),
            ("3", json!({ "recordId": "b1", "operation": "delete" })),
            ("4", json!({ "recordId": "b1", "operation": "delete" })),
        ],
    )
    .await;

    let upserts = harness.upserts();
    assert_eq!(upserts.len(), 2);
    assert_eq!(upserts[0], upserts[1]);
    assert_eq!(harness.deletes().len(), 2);
    assert!(harness
        .queue
        .reports()
        .iter()
        .all(|report| matches!(report.outcome, ReportedOutcome::Completed(_))));
}
