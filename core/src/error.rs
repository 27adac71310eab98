//! Error types for the GeoServer client core.
//!
//! # Design
//! Every failure is returned to the immediate caller as an `ApiError` value.
//! Server-reported failures carry a `DecodedError` built by the normalizer so
//! that both the canned label for the status code and the server's own
//! message survive. Transport failures are kept apart from server statuses:
//! the dispatcher reports them as status 0 and `check_status` lifts them into
//! `ApiError::Transport`.

use thiserror::Error;

use crate::normalize::DecodedError;

/// Errors returned by the catalog and the codec.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The configured base endpoint is not a usable URL.
    #[error("invalid server URL `{base}`: {reason}")]
    Configuration { base: String, reason: String },

    /// The HTTP exchange could not complete (DNS, refused connection, timeout).
    #[error("transport failure for {url}: {message}")]
    Transport { url: String, message: String },

    /// The server answered with a status other than the expected one.
    #[error(transparent)]
    UnexpectedStatus(#[from] DecodedError),

    /// The response body did not match the expected schema.
    #[error("failed to decode {target}: {reason} (body: {preview:?})")]
    Decode {
        target: String,
        reason: String,
        preview: String,
    },

    /// The request payload could not be serialized.
    #[error("failed to encode request body: {0}")]
    Encode(String),

    /// The request was rejected before it reached the network.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// HTTP status reported by the server, if the failure came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::UnexpectedStatus(err) => Some(err.status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
