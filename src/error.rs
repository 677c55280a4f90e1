//! Error types shared across the content store.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, ContentError>;

/// Main error type for the content store.
#[derive(Error, Debug)]
pub enum ContentError {
    /// The placement ring has no members at dispatch time.
    #[error("no storage nodes available")]
    NoNodesAvailable,

    /// An object or a node does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Local filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport or remote-side failure, attributed to the node it
    /// originated from.
    #[error("node {address}: {message}")]
    Node { address: String, message: String },

    /// Malformed seed string, duplicate address, or colliding ring hash.
    #[error("configuration error: {0}")]
    Config(String),

    /// An admin rebalance aborted mid-migration. `migrated` counts the
    /// files moved before the abort; the membership change is left in
    /// whatever state §admin semantics define (no rollback).
    #[error("rebalance aborted after {migrated} migrated file(s): {source}")]
    RebalancePartial {
        migrated: u32,
        #[source]
        source: Box<ContentError>,
    },

    /// External transcoder failure.
    #[error("transcode failed: {0}")]
    Transcode(String),

    /// Video metadata catalog failure.
    #[error("metadata error: {0}")]
    Metadata(String),
}

impl ContentError {
    /// Wraps a remote failure with the address of the node that produced it.
    pub fn node(address: impl Into<String>, message: impl ToString) -> Self {
        Self::Node {
            address: address.into(),
            message: message.to_string(),
        }
    }
}

impl From<rusqlite::Error> for ContentError {
    fn from(err: rusqlite::Error) -> Self {
        ContentError::Metadata(err.to_string())
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ContentError {
    fn into_response(self) -> Response {
        let status = match &self {
            ContentError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = ErrorResponse {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
