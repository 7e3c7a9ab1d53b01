//! Shared Error Types
//!
//! Errors crossing the capability boundary and the composer's submission
//! pipeline. All variants carry plain strings so results stay `Clone` and
//! `Send` and can travel over channels between worker threads and the UI.

use thiserror::Error;

/// Failure reported by a platform capability (identity, store, or blobs).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// The request never completed (connection refused, timeout, ...)
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status
    #[error("backend rejected the request: {0}")]
    Backend(String),

    /// The response arrived but could not be decoded
    #[error("malformed response: {0}")]
    Decode(String),
}

impl PlatformError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }
}

/// Failure of a composer submission. The stage matters: an upload failure
/// aborts the whole submission before any record is written.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("attachment upload failed: {0}")]
    Upload(PlatformError),

    #[error("message could not be sent: {0}")]
    Insert(PlatformError),
}
