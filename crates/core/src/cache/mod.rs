//! In-memory request cache for remote content.
//!
//! This module provides a read-through cache in front of the content
//! service. It supports:
//!
//! - Stale-while-revalidate reads with per-request TTL
//! - De-duplication of concurrent identical requests
//! - Bounded retries for transient failures
//! - LRU eviction once a configured entry count is reached
//!
//! The cache is an explicit object injected into controllers; clones share
//! state, and [`ContentCache::clear`] resets it between sessions or tests.

pub mod key;
pub mod query;

use std::sync::Arc;

pub use key::{CacheKey, ResourceKind};
pub use query::{EntryState, QueryCache, QueryOptions};

use crate::model::{ContentItem, Page};

/// Cache for listing pages and single items, sharing one lifecycle.
#[derive(Debug, Clone)]
pub struct ContentCache {
    pages: QueryCache<Arc<Page<ContentItem>>>,
    items: QueryCache<Arc<ContentItem>>,
}

impl ContentCache {
    /// Create a cache; each resource kind holds at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self { pages: QueryCache::new(capacity), items: QueryCache::new(capacity) }
    }

    pub fn pages(&self) -> &QueryCache<Arc<Page<ContentItem>>> {
        &self.pages
    }

    pub fn items(&self) -> &QueryCache<Arc<ContentItem>> {
        &self.items
    }

    pub fn entry_state(&self, key: &CacheKey) -> Option<EntryState> {
        match key.kind() {
            ResourceKind::Listing => self.pages.entry_state(key),
            ResourceKind::Detail => self.items.entry_state(key),
        }
    }

    pub fn invalidate(&self, key: &CacheKey) -> bool {
        match key.kind() {
            ResourceKind::Listing => self.pages.invalidate(key),
            ResourceKind::Detail => self.items.invalidate(key),
        }
    }

    pub fn invalidate_kind(&self, kind: ResourceKind) -> usize {
        match kind {
            ResourceKind::Listing => self.pages.clear(),
            ResourceKind::Detail => self.items.clear(),
        }
    }

    /// Drop every entry; returns how many were removed.
    pub fn clear(&self) -> usize {
        self.pages.clear() + self.items.clear()
    }

    pub fn len(&self) -> usize {
        self.pages.len() + self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entry bound of each resource kind.
    pub fn capacity(&self) -> usize {
        self.pages.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[tokio::test]
    async fn test_routes_by_kind() {
        let cache = ContentCache::new(4);
        assert_eq!(cache.capacity(), 4);
        let options = QueryOptions::default();

        cache
            .pages()
            .get(CacheKey::listing(1, 6), options, || async {
                Ok::<_, Error>(Arc::new(Page::from_remote(Vec::new(), 1, 6, Some(0), None)))
            })
            .await
            .unwrap();
        cache
            .items()
            .get(CacheKey::detail("hello"), options, || async { Ok::<_, Error>(Arc::new(ContentItem::new("hello", "Hello"))) })
            .await
            .unwrap();

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.entry_state(&CacheKey::detail("hello")), Some(EntryState::Fresh));
        assert_eq!(cache.entry_state(&CacheKey::listing(1, 6)), Some(EntryState::Fresh));

        assert!(cache.invalidate(&CacheKey::detail("hello")));
        assert_eq!(cache.invalidate_kind(ResourceKind::Listing), 1);
        assert!(cache.is_empty());
    }
}
