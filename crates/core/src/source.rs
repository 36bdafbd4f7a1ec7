//! Seam between controllers and the remote content service.

use async_trait::async_trait;

use crate::Error;
use crate::model::{ContentItem, Page};

/// Read access to published content.
///
/// Implementations are stateless apart from connection reuse and surface
/// failures with the [`Error`] taxonomy unchanged.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch page `page` (1-indexed) of `page_size` summaries.
    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<Page<ContentItem>, Error>;

    /// Fetch a single item by slug. Fails with [`Error::NotFound`] when no item matches.
    async fn fetch_by_identifier(&self, identifier: &str) -> Result<ContentItem, Error>;
}
