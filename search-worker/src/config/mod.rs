//! Configuration for the search worker.

mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::{redact_credentials, LogFormat, WorkerSettings};
