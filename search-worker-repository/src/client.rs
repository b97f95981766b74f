//! Search index client implementation.
//!
//! This module provides the client the worker uses to write to and delete
//! from the search index. It validates requests, then delegates to the
//! injected `SearchIndexProvider`.

use tracing::debug;

use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use search_worker_shared::IndexDocument;

/// The main client for interacting with the search index.
pub struct SearchIndexClient {
    provider: Box<dyn SearchIndexProvider>,
}

impl SearchIndexClient {
    /// Create a new SearchIndexClient backed by `provider`.
    pub fn new(provider: Box<dyn SearchIndexProvider>) -> Self {
        Self { provider }
    }

    /// Add or replace documents in the search index.
    /// Input: Vec<IndexDocument> (every document needs a non-empty id)
    /// Output: Result<(), SearchIndexError>
    ///
    /// An empty batch is a no-op.
    pub async fn upsert(&self, documents: Vec<IndexDocument>) -> Result<(), SearchIndexError> {
        if documents.is_empty() {
            return Ok(());
        }

        for document in &documents {
            if document.id.is_empty() {
                return Err(SearchIndexError::validation("All documents must have an id"));
            }
        }

        self.provider.upsert_documents(&documents).await
    }

    /// Delete a document from the search index.
    /// Input: document id (required)
    /// Output: Result<(), SearchIndexError>
    ///
    /// Deleting a document that is not in the index succeeds.
    pub async fn delete(&self, document_id: &str) -> Result<(), SearchIndexError> {
        if document_id.is_empty() {
            return Err(SearchIndexError::validation("document id is required"));
        }

        match self.provider.delete_document(document_id).await {
            Err(SearchIndexError::DocumentNotFound(_)) => {
                debug!(document_id = %document_id, "Document already absent from index");
                Ok(())
            }
            result => result,
        }
    }

    /// Ensure the search index exists.
    pub async fn ensure_index(&self) -> Result<(), SearchIndexError> {
        self.provider.ensure_index_exists().await
    }

    /// Check if the search backend is healthy.
    pub async fn health_check(&self) -> Result<bool, SearchIndexError> {
        self.provider.health_check().await
    }
}
