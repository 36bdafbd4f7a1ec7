//! Content service request types and validation.

use serde::Serialize;

use super::ApiError;

/// Largest page size the client will request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Query parameters for the published listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListingRequest {
    /// 1-indexed page number.
    pub page: u32,
    /// Items per page.
    pub limit: u32,
}

impl ListingRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }

    /// Validate the request parameters.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.page == 0 {
            return Err(ApiError::InvalidPage("page must be at least 1".to_string()));
        }

        if self.limit == 0 || self.limit > MAX_PAGE_SIZE {
            return Err(ApiError::InvalidPage(format!("limit must be 1-{MAX_PAGE_SIZE}, got {}", self.limit)));
        }

        Ok(())
    }
}

/// Trim a slug and reject empty or path-like values.
pub fn validate_slug(slug: &str) -> Result<&str, ApiError> {
    let slug = slug.trim();

    if slug.is_empty() {
        return Err(ApiError::InvalidSlug("slug cannot be empty".to_string()));
    }

    if slug.contains('/') {
        return Err(ApiError::InvalidSlug(format!("slug must not contain '/': {slug}")));
    }

    Ok(slug)
}
