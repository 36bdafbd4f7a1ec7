//! Unified error types for folio.
//!
//! Every failure is scoped to the single page or item that was requested.
//! The same value is handed to every waiter of a de-duplicated load, so the
//! type is `Clone` and carries rendered messages instead of source errors.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Unified error types for content access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Transport failure, no response was received.
    #[error("NETWORK_ERROR: {0}")]
    Network(String),

    /// The request did not complete within the configured timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    Timeout(String),

    /// The content service answered with a non-2xx status.
    #[error("SERVER_ERROR: HTTP {status}")]
    Server { status: u16 },

    /// The response body could not be parsed into the expected shape.
    #[error("DECODE_ERROR: {0}")]
    Decode(String),

    /// The request was valid but no matching resource exists.
    #[error("NOT_FOUND: {0}")]
    NotFound(String),

    /// The caller passed an out-of-range page or an empty identifier.
    #[error("INVALID_INPUT: {0}")]
    Validation(String),
}

/// Serializable discriminant of [`Error`], exposed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Network,
    Timeout,
    Server,
    Decode,
    NotFound,
    Validation,
}

impl Error {
    /// Whether a retry has a chance of succeeding.
    ///
    /// Decode and not-found failures are deterministic and are never retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Network(_) | Error::Timeout(_) | Error::Server { .. })
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Network(_) => ErrorKind::Network,
            Error::Timeout(_) => ErrorKind::Timeout,
            Error::Server { .. } => ErrorKind::Server,
            Error::Decode(_) => ErrorKind::Decode,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Validation(_) => ErrorKind::Validation,
        }
    }
}

/// Error details as shown in a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl From<&Error> for ErrorInfo {
    fn from(err: &Error) -> Self {
        let status = match err {
            Error::Server { status } => Some(*status),
            _ => None,
        };
        Self { kind: err.kind(), message: err.to_string(), status }
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::Validation(msg) => (-32602, msg.clone()),
            Error::NotFound(msg) => (-32001, msg.clone()),
            Error::Decode(msg) => (-32002, msg.clone()),
            Error::Timeout(msg) => (-32006, msg.clone()),
            Error::Network(msg) => (-32007, msg.clone()),
            Error::Server { status } => (-32008, format!("content service returned HTTP {status}")),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
