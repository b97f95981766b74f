//! Record store trait definition.

use async_trait::async_trait;

use crate::error::StoreError;
use search_worker_shared::RecordProjection;

/// Read-only access to records for indexing.
///
/// Implementations must be `Send + Sync`; one instance is shared by every
/// job the worker runs.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch a record with its link, text and tag associations.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(RecordProjection))` - The record's current state
    /// * `Ok(None)` - No record with this id exists
    /// * `Err(StoreError)` - If the store could not be read
    async fn find_record_by_id(&self, id: &str) -> Result<Option<RecordProjection>, StoreError>;
}
