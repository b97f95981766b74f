//! Record projection types.
//!
//! A projection is the read-only view of a record and its sub-entities,
//! assembled by the record store for a single indexing job.

use serde::{Deserialize, Serialize};

/// Link sub-entity of a link-type record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDetails {
    /// The bookmarked URL.
    pub url: String,
    /// Page title, if it has been crawled.
    pub title: Option<String>,
    /// Page description, if it has been crawled.
    pub description: Option<String>,
}

/// Free-text sub-entity of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextDetails {
    pub content: String,
}

/// Denormalized view of a record used to build its index document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordProjection {
    /// The record's identifier.
    pub id: String,
    /// The user owning the record.
    pub owner_id: String,
    /// Present only for link-type records.
    pub link: Option<LinkDetails>,
    /// Present only when the record carries free text.
    pub text: Option<TextDetails>,
    /// Names of the tags attached to the record.
    pub tags: Vec<String>,
}

impl RecordProjection {
    /// Create a projection with identity only: no link, no text, no tags.
    pub fn new(id: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            owner_id: owner_id.into(),
            link: None,
            text: None,
            tags: Vec::new(),
        }
    }

    /// Attach a link sub-entity.
    pub fn with_link(mut self, link: LinkDetails) -> Self {
        self.link = Some(link);
        self
    }

    /// Attach a text sub-entity.
    pub fn with_text(mut self, content: impl Into<String>) -> Self {
        self.text = Some(TextDetails {
            content: content.into(),
        });
        self
    }

    /// Replace the tag set.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}
