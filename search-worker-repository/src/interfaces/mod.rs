//! Interface definitions for the search index client.
//!
//! This module defines the abstract traits that allow for dependency
//! injection and swappable search backend implementations.

mod search_client_provider;
mod search_index_provider;

pub use search_client_provider::{SearchClientProvider, SharedSearchClient};
pub use search_index_provider::SearchIndexProvider;
