//! # Search Worker Repository
//!
//! This crate provides the search index client used by the indexing worker:
//! the backend-agnostic `SearchIndexProvider` trait, the `SearchIndexClient`
//! facade that validates requests before they reach the backend, the
//! `SearchClientProvider` handle lookup, and a concrete implementation for
//! OpenSearch.

pub mod client;
pub mod errors;
pub mod interfaces;
pub mod opensearch;

pub use client::SearchIndexClient;
pub use errors::SearchIndexError;
pub use interfaces::{SearchClientProvider, SearchIndexProvider, SharedSearchClient};
pub use opensearch::{IndexConfig, OpenSearchClient};
