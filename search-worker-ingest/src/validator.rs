//! Request validation.
//!
//! Turns the untyped payload of a queued job into an [`IndexingRequest`].

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use search_worker_shared::{IndexOperation, IndexingRequest};

const RECORD_ID_FIELD: &str = "recordId";
const OPERATION_FIELD: &str = "operation";

/// Longest rendering of a received value kept in an error message.
const MAX_RECEIVED_LEN: usize = 200;

/// A payload that does not describe a valid indexing request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("field `{field}` {problem}, received {received}")]
pub struct ValidationError {
    /// The offending field, or `payload` when the whole payload is wrong.
    pub field: &'static str,
    /// What was wrong with it.
    pub problem: String,
    /// Compact rendering of the value that was received.
    pub received: Received,
}

/// The value found where a field was expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Received {
    Missing,
    Value(String),
}

impl Received {
    fn of(value: Option<&Value>) -> Self {
        match value {
            None => Received::Missing,
            Some(value) => {
                let mut rendered = value.to_string();
                if rendered.len() > MAX_RECEIVED_LEN {
                    let mut cut = MAX_RECEIVED_LEN;
                    while !rendered.is_char_boundary(cut) {
                        cut -= 1;
                    }
                    rendered.truncate(cut);
                    rendered.push_str("...");
                }
                Received::Value(rendered)
            }
        }
    }
}

impl fmt::Display for Received {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Received::Missing => f.write_str("nothing"),
            Received::Value(value) => f.write_str(value),
        }
    }
}

impl ValidationError {
    fn new(field: &'static str, problem: impl Into<String>, value: Option<&Value>) -> Self {
        Self {
            field,
            problem: problem.into(),
            received: Received::of(value),
        }
    }
}

/// Validate a raw job payload.
///
/// The payload must be an object with a non-empty string `recordId` and an
/// `operation` of exactly `"index"` or `"delete"`. Other fields are ignored.
pub fn validate(payload: &Value) -> Result<IndexingRequest, ValidationError> {
    let object = payload
        .as_object()
        .ok_or_else(|| ValidationError::new("payload", "must be an object", Some(payload)))?;

    let raw_record_id = object.get(RECORD_ID_FIELD);
    let record_id = match raw_record_id {
        Some(Value::String(id)) if !id.trim().is_empty() => id.clone(),
        Some(Value::String(_)) => {
            return Err(ValidationError::new(RECORD_ID_FIELD, "must not be empty", raw_record_id))
        }
        Some(_) => {
            return Err(ValidationError::new(RECORD_ID_FIELD, "must be a string", raw_record_id))
        }
        None => return Err(ValidationError::new(RECORD_ID_FIELD, "is required", None)),
    };

    let operation = match object.get(OPERATION_FIELD) {
        Some(Value::String(name)) => IndexOperation::parse(name),
        _ => None,
    }
    .ok_or_else(|| {
        ValidationError::new(
            OPERATION_FIELD,
            "must be one of \"index\", \"delete\"",
            object.get(OPERATION_FIELD),
        )
    })?;

    Ok(IndexingRequest::new(record_id, operation))
}
