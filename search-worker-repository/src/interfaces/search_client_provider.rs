//! Lookup of the process-wide search client handle.

use std::sync::Arc;

use async_trait::async_trait;

use crate::client::SearchIndexClient;

/// Hands out the search client for a job.
///
/// Returns `None` when search is not configured for this deployment, in which
/// case indexing jobs complete without doing anything.
#[async_trait]
pub trait SearchClientProvider: Send + Sync {
    async fn get_client(&self) -> Option<Arc<SearchIndexClient>>;
}

/// A client handle built once at startup and shared by every job.
#[derive(Clone, Default)]
pub struct SharedSearchClient {
    client: Option<Arc<SearchIndexClient>>,
}

impl SharedSearchClient {
    /// Wrap a configured client.
    pub fn new(client: SearchIndexClient) -> Self {
        Self {
            client: Some(Arc::new(client)),
        }
    }

    /// A handle for deployments that run without search.
    pub fn disabled() -> Self {
        Self { client: None }
    }

    /// Whether a client is available.
    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }
}

#[async_trait]
impl SearchClientProvider for SharedSearchClient {
    async fn get_client(&self) -> Option<Arc<SearchIndexClient>> {
        self.client.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_client_yields_none() {
        let provider = SharedSearchClient::disabled();

        assert!(!provider.is_enabled());
        assert!(provider.get_client().await.is_none());
    }
}
