//! Error types for the Mattermost driver.
//!
//! # Design
//! The binding layer adds no validation of its own, so the taxonomy is small:
//! failures that come out of the transport (`Transport`, `NotFound`, `Http`)
//! and failures turning a response into an entity (`Decode`). `NotFound`
//! keeps a dedicated variant because callers routinely branch on "the
//! resource does not exist" versus "the server rejected the call."

use serde::Deserialize;
use thiserror::Error;

/// Errors returned by the transport and by every endpoint method.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout, TLS).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server returned 404.
    #[error("resource not found: {message}")]
    NotFound { message: String },

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The response could not be turned into the expected shape, e.g. a
    /// team mapping without an `id`.
    #[error("malformed response: {0}")]
    Decode(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// True for failures raised by the transport: network errors and
    /// non-2xx statuses.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ApiError::Transport(_) | ApiError::NotFound { .. } | ApiError::Http { .. }
        )
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, ApiError::Decode(_))
    }

    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound { .. } => Some(404),
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn decode(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }

    /// Build the error for a non-2xx response, preferring the `message`
    /// field of a Mattermost error body over the raw text.
    pub(crate) fn from_status(status: u16, body: &[u8]) -> Self {
        let message = match serde_json::from_slice::<ServerError>(body) {
            Ok(err) => err.message,
            Err(_) => String::from_utf8_lossy(body).into_owned(),
        };
        if status == 404 {
            ApiError::NotFound { message }
        } else {
            ApiError::Http { status, message }
        }
    }
}

/// Error body returned by the Mattermost server.
#[derive(Debug, Deserialize)]
struct ServerError {
    message: String,
}
