//! Indexing request types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The mutation a job applies to the search index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexOperation {
    /// (Re)build the record's document from the primary store.
    Index,
    /// Remove the record's document from the index.
    Delete,
}

impl IndexOperation {
    /// Wire name of the operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexOperation::Index => "index",
            IndexOperation::Delete => "delete",
        }
    }

    /// Parse a wire name. Matching is exact and case-sensitive.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "index" => Some(IndexOperation::Index),
            "delete" => Some(IndexOperation::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for IndexOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated request to index or delete one record.
///
/// Fields are private so a request can only be built through [`IndexingRequest::new`]
/// (or the validator) and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexingRequest {
    record_id: String,
    operation: IndexOperation,
}

impl IndexingRequest {
    /// Create a request. Callers are expected to have checked that `record_id` is non-empty.
    pub fn new(record_id: impl Into<String>, operation: IndexOperation) -> Self {
        Self {
            record_id: record_id.into(),
            operation,
        }
    }

    /// Create an `index` request.
    pub fn index(record_id: impl Into<String>) -> Self {
        Self::new(record_id, IndexOperation::Index)
    }

    /// Create a `delete` request.
    pub fn delete(record_id: impl Into<String>) -> Self {
        Self::new(record_id, IndexOperation::Delete)
    }

    /// Identifier of the record to (re)index or remove.
    pub fn record_id(&self) -> &str {
        &self.record_id
    }

    /// The requested operation.
    pub fn operation(&self) -> IndexOperation {
        self.operation
    }
}
