//! OpenSearch index configuration and mappings.
//!
//! This module defines the index settings and mappings for the record search index.

use serde_json::{json, Value};

/// Default name of the search index.
pub const DEFAULT_INDEX_NAME: &str = "records";

/// Name and layout of the index the worker writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    /// The index name documents are written to.
    pub name: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INDEX_NAME)
    }
}

impl IndexConfig {
    /// Create a config for the named index.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Get the index settings and mappings for the record search index.
    ///
    /// - **Keyword fields**: `id`, `userId` and `tags` for filtering and exact lookups
    /// - **Text fields**: `title`, `description` and `content` for full-text matching
    /// - `url` is a keyword with a text sub-field so domains can be searched
    pub fn settings(&self) -> Value {
        json!({
            "settings": {
                "number_of_shards": 1,
                "number_of_replicas": 1
            },
            "mappings": {
                "properties": {
                    "id": {
                        "type": "keyword"
                    },
                    "userId": {
                        "type": "keyword"
                    },
                    "url": {
                        "type": "keyword",
                        "fields": {
                            "text": {
                                "type": "text"
                            }
                        }
                    },
                    "title": {
                        "type": "text"
                    },
                    "description": {
                        "type": "text"
                    },
                    "content": {
                        "type": "text"
                    },
                    "tags": {
                        "type": "keyword"
                    }
                }
            }
        })
    }
}
