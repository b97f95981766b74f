//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust client.

use async_trait::async_trait;
use opensearch::{
    cluster::ClusterHealthParts,
    http::{
        request::JsonBody,
        transport::{SingleNodeConnectionPool, TransportBuilder},
    },
    indices::{IndicesCreateParts, IndicesExistsParts},
    BulkParts, DeleteParts, OpenSearch,
};
use serde_json::{json, Value};
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::index_config::IndexConfig;
use search_worker_shared::IndexDocument;

/// OpenSearch client implementation.
///
/// # Example
///
/// ```ignore
/// use search_worker_repository::{IndexConfig, OpenSearchClient, SearchIndexClient};
///
/// let provider = OpenSearchClient::new("http://localhost:9200", IndexConfig::default())?;
/// let client = SearchIndexClient::new(Box::new(provider));
/// client.upsert(vec![IndexDocument::new("b1", "user-1")]).await?;
/// ```
pub struct OpenSearchClient {
    client: OpenSearch,
    index_config: IndexConfig,
}

impl OpenSearchClient {
    /// Create a new OpenSearch client for the specified URL.
    ///
    /// No request is sent; use `health_check` to verify the cluster is reachable.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    /// * `index_config` - The index the worker writes to
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchClient)` - A new client instance
    /// * `Err(SearchIndexError)` - If the URL is invalid or the transport cannot be built
    pub fn new(url: &str, index_config: IndexConfig) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(url).map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let host = parsed_url.host_str().unwrap_or_default().to_string();
        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            host = %host,
            index = %index_config.name,
            "Created OpenSearch client"
        );

        Ok(Self {
            client,
            index_config,
        })
    }

    /// Build the NDJSON body of a bulk request: one `index` action per document.
    fn bulk_body(documents: &[IndexDocument]) -> Result<Vec<JsonBody<Value>>, SearchIndexError> {
        let mut body: Vec<JsonBody<Value>> = Vec::with_capacity(documents.len() * 2);

        for document in documents {
            let source = serde_json::to_value(document)
                .map_err(|e| SearchIndexError::serialization(e.to_string()))?;
            body.push(json!({ "index": { "_id": document.id } }).into());
            body.push(source.into());
        }

        Ok(body)
    }

    /// Collect `(document id, reason)` for every rejected item of a bulk response.
    fn bulk_failures(response: &Value) -> Vec<(String, String)> {
        if !response["errors"].as_bool().unwrap_or(false) {
            return Vec::new();
        }

        response["items"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| {
                        let result = &item["index"];
                        let error = result.get("error")?;
                        let id = result["_id"].as_str().unwrap_or("unknown").to_string();
                        let reason = error["reason"]
                            .as_str()
                            .map(str::to_string)
                            .unwrap_or_else(|| error.to_string());
                        Some((id, reason))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl SearchIndexProvider for OpenSearchClient {
    /// Index documents with a single bulk request.
    ///
    /// Each document is written with an `index` action keyed by its id, which
    /// replaces any existing document with the same id.
    #[instrument(skip(self, documents), fields(count = documents.len()))]
    async fn upsert_documents(&self, documents: &[IndexDocument]) -> Result<(), SearchIndexError> {
        let body = Self::bulk_body(documents)?;

        let response = self
            .client
            .bulk(BulkParts::Index(&self.index_config.name))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Bulk request failed");
            return Err(SearchIndexError::index(format!(
                "Bulk request failed with status {}: {}",
                status, error_body
            )));
        }

        let response_body = response
            .json::<Value>()
            .await
            .map_err(|e| SearchIndexError::serialization(e.to_string()))?;

        let failures = Self::bulk_failures(&response_body);
        if let Some((id, reason)) = failures.first() {
            error!(failed = failures.len(), first_id = %id, "Bulk request had rejected documents");
            return Err(SearchIndexError::bulk_operation(
                failures.len(),
                documents.len(),
                format!("{}: {}", id, reason),
            ));
        }

        debug!(count = documents.len(), "Documents indexed");
        Ok(())
    }

    /// Delete a document from the search index.
    ///
    /// A 404 response means the document was already absent and counts as success.
    #[instrument(skip(self))]
    async fn delete_document(&self, document_id: &str) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .delete(DeleteParts::IndexId(&self.index_config.name, document_id))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status_code();

        // 404 is acceptable - document may not exist
        if !status.is_success() && status.as_u16() != 404 {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Delete request failed");
            return Err(SearchIndexError::delete(format!(
                "Delete failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(document_id = %document_id, "Document deleted");
        Ok(())
    }

    async fn ensure_index_exists(&self) -> Result<(), SearchIndexError> {
        let index_name = self.index_config.name.as_str();

        let exists = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index_name]))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        if exists.status_code().is_success() {
            debug!(index = %index_name, "Index already exists");
            return Ok(());
        }

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index_name))
            .body(self.index_config.settings())
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            // Another worker may have created it between the two calls.
            if error_body.contains("resource_already_exists_exception") {
                return Ok(());
            }
            return Err(SearchIndexError::index_creation(format!(
                "Create index failed with status {}: {}",
                status, error_body
            )));
        }

        info!(index = %index_name, "Created search index");
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, SearchIndexError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        if !response.status_code().is_success() {
            return Ok(false);
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| SearchIndexError::serialization(e.to_string()))?;

        let status = body["status"].as_str().unwrap_or("red");
        debug!(cluster_status = %status, "OpenSearch health");
        Ok(status != "red")
    }
}
