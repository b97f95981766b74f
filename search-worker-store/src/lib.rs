//! # Search Worker Store
//!
//! Read access to the primary record store. The worker only needs one
//! operation: fetch a record together with its link, text and tags so it can
//! be turned into a search document.

mod error;
mod record_store;
mod sql;

pub use error::StoreError;
pub use record_store::RecordStore;
pub use sql::SqlRecordStore;
