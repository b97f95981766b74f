//! # Search Worker Shared
//!
//! Shared types for the search indexing worker: the queued request, the
//! record projection read from the primary store, and the document
//! submitted to the search index.

mod document;
mod projection;
mod request;

pub use document::IndexDocument;
pub use projection::{LinkDetails, RecordProjection, TextDetails};
pub use request::{IndexOperation, IndexingRequest};
