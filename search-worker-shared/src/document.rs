//! Search index document.

use serde::{Deserialize, Serialize};

use crate::projection::{LinkDetails, RecordProjection};

/// The flattened document submitted to the search index.
///
/// Optional fields are omitted from the serialized form when absent, so a
/// record without a link never carries `url`, `title` or `description`, and a
/// record without text never carries `content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexDocument {
    /// Document identifier, equal to the record identifier.
    pub id: String,
    /// Owner of the record, used to scope searches per user.
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl IndexDocument {
    /// Create a document with identity fields only.
    pub fn new(id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            url: None,
            title: None,
            description: None,
            content: None,
            tags: Vec::new(),
        }
    }

    /// Set the link fields from a link sub-entity.
    pub fn with_link(mut self, link: LinkDetails) -> Self {
        self.url = Some(link.url);
        self.title = link.title;
        self.description = link.description;
        self
    }

    /// Set the free-text content.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set the tag names.
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

impl From<RecordProjection> for IndexDocument {
    fn from(record: RecordProjection) -> Self {
        let mut document = IndexDocument::new(record.id, record.owner_id).with_tags(record.tags);

        if let Some(link) = record.link {
            document = document.with_link(link);
        }
        if let Some(text) = record.text {
            document = document.with_content(text.content);
        }

        document
    }
}
