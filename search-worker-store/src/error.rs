//! Record store error types.

use thiserror::Error;

/// Errors that can occur while reading from the record store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to connect to the database.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// A query failed to execute.
    #[error("Query error: {0}")]
    QueryError(String),

    /// A row did not have the expected shape.
    #[error("Decode error: {0}")]
    DecodeError(String),
}

impl StoreError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a query error.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::QueryError(msg.into())
    }

    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::DecodeError(msg.into())
    }
}
