//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search index operations,
//! allowing for different backend implementations (OpenSearch, mocks, etc.).

use async_trait::async_trait;

use crate::errors::SearchIndexError;
use search_worker_shared::IndexDocument;

/// Abstracts the underlying search index implementation.
///
/// Implementations are injected into `SearchIndexClient`, which validates
/// requests before they reach the backend. All implementations must be
/// `Send + Sync` so a single instance can be shared across concurrent jobs.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Add or replace documents, keyed by `IndexDocument::id`.
    ///
    /// # Arguments
    ///
    /// * `documents` - The documents to write
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If every document was written
    /// * `Err(SearchIndexError)` - If the request or any single document failed
    async fn upsert_documents(&self, documents: &[IndexDocument]) -> Result<(), SearchIndexError>;

    /// Delete a document by identifier.
    ///
    /// Implementations should treat a missing document as success. Those that
    /// cannot must return `SearchIndexError::DocumentNotFound`, which the
    /// `SearchIndexClient` swallows.
    async fn delete_document(&self, document_id: &str) -> Result<(), SearchIndexError>;

    /// Ensure the search index exists with proper mappings.
    ///
    /// This should be called during application startup.
    async fn ensure_index_exists(&self) -> Result<(), SearchIndexError>;

    /// Check if the search backend is healthy and reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the backend is healthy
    /// * `Ok(false)` - If the backend responded but is unhealthy
    /// * `Err(SearchIndexError)` - If the health check could not be executed
    async fn health_check(&self) -> Result<bool, SearchIndexError>;
}
