//! Content service client error types.

use std::sync::Arc;

use folio_core::Error;

/// Errors from the content service client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// Invalid page or page size.
    #[error("invalid page request: {0}")]
    InvalidPage(String),

    /// Empty or otherwise unusable slug.
    #[error("invalid slug: {0}")]
    InvalidSlug(String),

    /// Base URL could not be used to build endpoints.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// No item matches the requested slug.
    #[error("no content with slug {0:?}")]
    NotFound(String),

    /// Non-success HTTP response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout after {0}ms")]
    Timeout(u64),

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::InvalidPage(_) | ApiError::InvalidSlug(_) | ApiError::InvalidBaseUrl(_) => {
                Error::Validation(err.to_string())
            }
            ApiError::NotFound(slug) => Error::NotFound(slug),
            ApiError::HttpError { status } => Error::Server { status },
            ApiError::Timeout(_) => Error::Timeout(err.to_string()),
            ApiError::Network(_) => Error::Network(err.to_string()),
            ApiError::Parse(msg) => Error::Decode(msg),
        }
    }
}
