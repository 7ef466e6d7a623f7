//! Error taxonomy for the task client.
//!
//! # Design
//! One enum covers every way a networked call can fail, so callers match a
//! single type regardless of which layer gave up. Callers that branch on a
//! specific HTTP status read it back through [`ApiError::status`];
//! `is_not_found` exists because "the resource does not exist" is the
//! distinction callers reach for most often.

use thiserror::Error;

/// Errors returned by session and task operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (connection refused,
    /// DNS failure, broken socket).
    #[error("network error: {0}")]
    Transport(String),

    /// The server answered 2xx but the body was not the JSON the client
    /// expected.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// The server answered with a non-2xx status. `message` is the
    /// response's `detail` string when it has one, else a generic fallback.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// A client-side precondition failed; no request was sent.
    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    /// HTTP status of the failure, when the server produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the server said the resource does not exist (404).
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// True when the server rejected the credentials (401).
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}
