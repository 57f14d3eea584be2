//! Error types for the aggregation engine.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort an aggregation request.
///
/// A request either produces a complete result or exactly one of these;
/// partial aggregates are never returned alongside an error.
#[derive(Debug, Error)]
pub enum UsageError {
    /// The target date did not match `yyyy-MM-dd`.
    #[error("invalid target date: {value:?} (expected yyyy-MM-dd)")]
    InvalidTargetDate { value: String },

    /// The session list could not be read.
    #[error("session source not found: {}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The session list was read but could not be decoded.
    #[error("malformed session data in {}", path.display())]
    MalformedSource {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
