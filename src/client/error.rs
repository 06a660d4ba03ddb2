//! Protocol client errors.

use reqwest::header::HeaderMap;
use thiserror::Error;

use crate::occi::StructureError;

/// A non-2xx response, kept whole for inspection by tests.
#[derive(Debug, Clone)]
pub struct OcciError {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
}

/// Errors raised by [`OcciClient`](crate::client::OcciClient).
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-success status.
    #[error("OCCI error: HTTP status {}", .0.status)]
    Status(OcciError),

    /// Connection, TLS or timeout failure in the transport.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A header name or value could not be encoded.
    #[error("invalid header data: {0}")]
    InvalidHeader(String),

    /// The response body held malformed structures.
    #[error(transparent)]
    Structure(#[from] StructureError),
}

impl ClientError {
    /// The error response, when the server produced one.
    pub fn response(&self) -> Option<&OcciError> {
        match self {
            ClientError::Status(e) => Some(e),
            _ => None,
        }
    }

    /// HTTP status of the error response, if any.
    pub fn status(&self) -> Option<u16> {
        self.response().map(|e| e.status)
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
