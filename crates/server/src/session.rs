//! Application session shared by all tool calls.
//!
//! One server process is one session: a single cache and one controller per
//! flow, all built from the loaded configuration.

use std::sync::Arc;

use folio_core::{
    AppConfig, ContentCache, ContentSource, DetailController, ListingController, ListingSettings, SiteInfo,
};

pub struct Session {
    pub cache: ContentCache,
    pub listing: ListingController,
    pub detail: DetailController,
    pub site: SiteInfo,
}

impl Session {
    pub fn new(source: Arc<dyn ContentSource>, config: &AppConfig) -> Self {
        let cache = ContentCache::new(config.cache_capacity);
        let site = SiteInfo::from(config);
        let listing = ListingController::new(Arc::clone(&source), cache.clone(), ListingSettings::from(config));
        let detail = DetailController::new(source, cache.clone(), config.detail_query(), site.clone());

        tracing::debug!(
            page_size = config.page_size,
            window_size = config.window_size,
            capacity = config.cache_capacity,
            "session created"
        );

        Self { cache, listing, detail, site }
    }

    pub fn page_size(&self) -> u32 {
        self.listing.settings().page_size
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use folio_core::{ContentItem, Error, Page};
    use rmcp::model::CallToolResult;

    use super::*;

    /// In-memory source over `total` items named `post-{i}`.
    pub struct FixedSource {
        pub total: u64,
        pub calls: AtomicUsize,
    }

    impl FixedSource {
        pub fn new(total: u64) -> Self {
            Self { total, calls: AtomicUsize::new(0) }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ContentSource for FixedSource {
        async fn fetch_page(&self, page: u32, page_size: u32) -> Result<Page<ContentItem>, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let start = u64::from(page - 1) * u64::from(page_size);
            let end = (start + u64::from(page_size)).min(self.total);
            let items = (start..end).map(|i| ContentItem::new(format!("post-{i}"), format!("Post {i}"))).collect();
            Ok(Page::from_remote(items, page, page_size, Some(self.total), None))
        }

        async fn fetch_by_identifier(&self, identifier: &str) -> Result<ContentItem, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            identifier
                .strip_prefix("post-")
                .and_then(|n| n.parse::<u64>().ok())
                .filter(|n| *n < self.total)
                .map(|n| ContentItem::new(identifier, format!("Post {n}")))
                .ok_or_else(|| Error::NotFound(identifier.to_string()))
        }
    }

    pub fn session(total: u64) -> (Arc<FixedSource>, Session) {
        let source = Arc::new(FixedSource::new(total));
        let config = AppConfig { site_url: Some("https://example.com".into()), ..Default::default() };
        let session = Session::new(source.clone(), &config);
        (source, session)
    }

    /// Decode the JSON text content of a tool result.
    pub fn output<T: serde::de::DeserializeOwned>(result: &CallToolResult) -> T {
        let content_val = serde_json::to_value(&result.content[0]).unwrap();
        let text = content_val
            .get("text")
            .and_then(|v| v.as_str())
            .expect("Expected text field in content");
        serde_json::from_str(text).unwrap()
    }
}
