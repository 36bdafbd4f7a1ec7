//! Content data model.
//!
//! Items are owned by the remote content service and are immutable here.
//! Fields the service may omit are explicit `Option`s; the presentation
//! layer decides how absence is rendered.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One published article-like resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ContentItem {
    /// Opaque identifier assigned by the content service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Stable slug, the identifier used for detail lookups.
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    /// HTML body; listing payloads usually omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    /// Ordered tags; duplicates are preserved as sent.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<Media>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meta_keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Author {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Media {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Category {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
}

impl ContentItem {
    /// Minimal item with only the required fields set.
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: None,
            slug: slug.into(),
            title: title.into(),
            excerpt: None,
            body: None,
            published_at: None,
            author: None,
            tags: Vec::new(),
            media: None,
            featured: false,
            meta_description: None,
            meta_keywords: Vec::new(),
            category: None,
        }
    }
}

/// Items that carry a stable identifier, unique within a page.
pub trait Identified {
    fn identifier(&self) -> &str;
}

impl Identified for ContentItem {
    fn identifier(&self) -> &str {
        &self.slug
    }
}

/// A bounded, numbered slice of the full collection.
///
/// Invariants, enforced by [`Page::from_remote`]:
/// - `items.len() <= page_size`
/// - `1 <= current_page <= total_pages`
/// - `total_pages == max(1, ceil(total_items / page_size))`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub page_size: u32,
}

/// Number of pages needed for `total_items`; never less than one.
pub fn total_pages_for(total_items: u64, page_size: u32) -> u32 {
    let pages = total_items.div_ceil(u64::from(page_size.max(1))).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

impl<T: Identified> Page<T> {
    /// Build a page from what the content service reported.
    ///
    /// Reported totals are advisory: `total_pages` is recomputed from
    /// `total_items` when both are present. With neither present the
    /// collection is treated as a single page.
    pub fn from_remote(
        mut items: Vec<T>, current_page: u32, page_size: u32, total_items: Option<u64>, total_pages: Option<u32>,
    ) -> Self {
        let page_size = page_size.max(1);

        if items.len() > page_size as usize {
            tracing::warn!(received = items.len(), page_size, "page holds more items than requested; truncating");
            items.truncate(page_size as usize);
        }

        let received = items.len();
        let mut seen = HashSet::with_capacity(received);
        items.retain(|item| seen.insert(item.identifier().to_owned()));
        if items.len() != received {
            tracing::warn!(dropped = received - items.len(), "duplicate identifiers within page");
        }

        let (total_items, total_pages) = match (total_items, total_pages) {
            (Some(count), reported) => {
                let computed = total_pages_for(count, page_size);
                if let Some(reported) = reported
                    && reported != computed
                {
                    tracing::debug!(reported, computed, "reported page count disagrees with item count");
                }
                (count, computed)
            }
            (None, Some(pages)) => {
                let pages = pages.max(1);
                let last_len = if current_page >= pages { items.len() as u64 } else { u64::from(page_size) };
                ((u64::from(pages) - 1) * u64::from(page_size) + last_len, pages)
            }
            (None, None) => (items.len() as u64, 1),
        };

        Self { items, current_page: current_page.clamp(1, total_pages), total_pages, total_items, page_size }
    }

    pub fn has_unique_identifiers(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.items.len());
        self.items.iter().all(|item| seen.insert(item.identifier()))
    }
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(slugs: &[&str]) -> Vec<ContentItem> {
        slugs.iter().map(|s| ContentItem::new(*s, s.to_uppercase())).collect()
    }

    #[test]
    fn test_total_pages_for() {
        assert_eq!(total_pages_for(0, 6), 1);
        assert_eq!(total_pages_for(1, 6), 1);
        assert_eq!(total_pages_for(6, 6), 1);
        assert_eq!(total_pages_for(7, 6), 2);
        assert_eq!(total_pages_for(60, 6), 10);
    }

    #[test]
    fn test_empty_collection_is_one_page() {
        let page: Page<ContentItem> = Page::from_remote(Vec::new(), 1, 6, Some(0), Some(0));
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.current_page, 1);
        assert!(page.is_empty());
        assert!(!page.has_previous());
        assert!(!page.has_next());
    }

    #[test]
    fn test_total_pages_recomputed_from_items() {
        let page = Page::from_remote(items(&["a", "b"]), 2, 2, Some(5), Some(7));
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_items, 5);
        assert!(page.has_previous());
        assert!(page.has_next());
    }

    #[test]
    fn test_current_page_clamped() {
        let page = Page::from_remote(items(&["a"]), 9, 2, Some(3), None);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.current_page, 2);

        let page = Page::from_remote(items(&["a"]), 0, 2, Some(3), None);
        assert_eq!(page.current_page, 1);
    }

    #[test]
    fn test_oversized_page_truncated() {
        let page = Page::from_remote(items(&["a", "b", "c", "d"]), 1, 3, Some(10), None);
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.items[2].slug, "c");
    }

    #[test]
    fn test_duplicate_identifiers_dropped() {
        let page = Page::from_remote(items(&["a", "b", "a", "c"]), 1, 6, Some(4), None);
        let slugs: Vec<_> = page.items.iter().map(|i| i.slug.as_str()).collect();
        assert_eq!(slugs, vec!["a", "b", "c"]);
        assert!(page.has_unique_identifiers());
    }

    #[test]
    fn test_missing_item_count_estimated_from_pages() {
        let page = Page::from_remote(items(&["a", "b"]), 1, 2, None, Some(3));
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_items, 6);

        let last = Page::from_remote(items(&["e"]), 3, 2, None, Some(3));
        assert_eq!(last.total_items, 5);
    }

    #[test]
    fn test_missing_totals_is_single_page() {
        let page = Page::from_remote(items(&["a", "b"]), 1, 6, None, None);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.total_items, 2);
    }

    #[test]
    fn test_tags_keep_duplicates_and_order() {
        let mut item = ContentItem::new("a", "A");
        item.tags = vec!["rust".into(), "ai".into(), "rust".into()];
        let json = serde_json::to_string(&item).unwrap();
        let back: ContentItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back.tags, vec!["rust", "ai", "rust"]);
    }
}
