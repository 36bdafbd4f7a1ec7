//! Paginated listing controller.
//!
//! `set_page` rejects out-of-range pages instead of clamping them: page 0 is
//! always invalid, and once a page has loaded, pages past `total_pages` are
//! invalid too. Before the first load the page count is unknown, so a page
//! past the end is only caught when the service answers; it is rejected the
//! same way and never cached. A rejected request leaves the view's content
//! untouched.

use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch};

use super::{ControllerEvent, RequestGeneration, Resolution, Status};
use crate::cache::{CacheKey, ContentCache, QueryOptions};
use crate::config::AppConfig;
use crate::error::{Error, ErrorInfo, ErrorKind};
use crate::model::{ContentItem, Page};
use crate::pagination::{PageWindow, compute_window};
use crate::source::ContentSource;

/// Listing behavior derived from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingSettings {
    pub page_size: u32,
    pub window_size: u32,
    pub query: QueryOptions,
}

impl From<&AppConfig> for ListingSettings {
    fn from(config: &AppConfig) -> Self {
        Self { page_size: config.page_size, window_size: config.window_size, query: config.listing_query() }
    }
}

/// What the presentation layer renders for the listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ListingView {
    pub status: Status,
    pub items: Vec<ContentItem>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    /// Pagination controls; `None` until a page has loaded.
    pub window: Option<PageWindow>,
    pub has_previous: bool,
    pub has_next: bool,
    /// False when everything fits on one page.
    pub show_pagination: bool,
    /// True when a loaded page has no items.
    pub is_empty: bool,
    /// Page of the most recent request, which may still be loading.
    pub requested_page: Option<u32>,
    pub error: Option<ErrorInfo>,
}

impl Default for ListingView {
    fn default() -> Self {
        Self {
            status: Status::Idle,
            items: Vec::new(),
            current_page: 1,
            total_pages: 1,
            total_items: 0,
            window: None,
            has_previous: false,
            has_next: false,
            show_pagination: false,
            is_empty: false,
            requested_page: None,
            error: None,
        }
    }
}

impl ListingView {
    fn is_loaded(&self) -> bool {
        self.window.is_some()
    }

    fn apply_page(&mut self, page: &Page<ContentItem>, window_size: u32) {
        let window = compute_window(page.current_page, page.total_pages, window_size);
        self.status = Status::Ready;
        self.items = page.items.clone();
        self.current_page = page.current_page;
        self.total_pages = page.total_pages;
        self.total_items = page.total_items;
        self.has_previous = window.has_previous;
        self.has_next = window.has_next;
        self.show_pagination = window.is_navigable();
        self.is_empty = page.is_empty();
        self.window = Some(window);
        self.error = None;
    }

    /// Record a failure; previously loaded items stay in place.
    fn apply_error(&mut self, err: &Error) {
        self.status = if matches!(err, Error::NotFound(_)) { Status::NotFound } else { Status::Error };
        self.error = Some(ErrorInfo::from(err));
    }

    /// Undo the loading transition of a rejected request.
    fn settle(&mut self) {
        self.status = match &self.error {
            Some(info) if info.kind == ErrorKind::NotFound => Status::NotFound,
            Some(_) => Status::Error,
            None if self.is_loaded() => Status::Ready,
            None => Status::Idle,
        };
        self.requested_page = self.is_loaded().then_some(self.current_page);
    }
}

/// Owns the current page and drives page changes through the cache.
pub struct ListingController {
    source: Arc<dyn ContentSource>,
    cache: ContentCache,
    settings: ListingSettings,
    generation: RequestGeneration,
    view: watch::Sender<ListingView>,
    events: broadcast::Sender<ControllerEvent>,
}

impl ListingController {
    pub fn new(source: Arc<dyn ContentSource>, cache: ContentCache, settings: ListingSettings) -> Self {
        let (view, _) = watch::channel(ListingView::default());
        let (events, _) = broadcast::channel(16);
        Self { source, cache, settings, generation: RequestGeneration::default(), view, events }
    }

    /// Snapshot of the current view.
    pub fn view(&self) -> ListingView {
        self.view.borrow().clone()
    }

    /// Receive every view update.
    pub fn subscribe(&self) -> watch::Receiver<ListingView> {
        self.view.subscribe()
    }

    /// Receive presentation signals such as scroll-to-top.
    pub fn events(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    pub fn settings(&self) -> &ListingSettings {
        &self.settings
    }

    /// Cache key of `page` under this controller's page size.
    pub fn cache_key(&self, page: u32) -> CacheKey {
        CacheKey::listing(page, self.settings.page_size)
    }

    /// Switch to `page`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an out-of-range page, including one
    /// the service reports as past the last page. Fetch failures are
    /// reported through the view, not as an `Err`.
    pub async fn set_page(&self, page: u32) -> Result<Resolution<ListingView>, Error> {
        self.validate_page(page)?;

        let ticket = self.generation.begin();
        self.view.send_if_modified(|view| {
            if !self.generation.is_current(ticket) {
                return false;
            }
            view.status = Status::Loading;
            view.requested_page = Some(page);
            true
        });

        let result = self.load_page(page).await;

        if let Err(err @ Error::Validation(_)) = &result {
            self.cache.invalidate(&self.cache_key(page));
            self.view.send_if_modified(|view| {
                if !self.generation.is_current(ticket) {
                    return false;
                }
                view.settle();
                true
            });
            tracing::debug!(page, error = %err, "page request rejected");
            return Err(err.clone());
        }

        let mut applied = None;
        self.view.send_if_modified(|view| {
            if !self.generation.is_current(ticket) {
                return false;
            }
            match &result {
                Ok(loaded) => view.apply_page(loaded, self.settings.window_size),
                Err(err) => view.apply_error(err),
            }
            applied = Some(view.clone());
            true
        });

        let Some(view) = applied else {
            tracing::debug!(page, "discarding result of superseded page request");
            return Ok(Resolution::Superseded);
        };

        match &result {
            Ok(_) => {
                tracing::debug!(page = view.current_page, total_pages = view.total_pages, "listing page ready");
                let _ = self.events.send(ControllerEvent::ScrollToTop { page: view.current_page });
            }
            Err(err) => tracing::warn!(page, error = %err, "listing page failed"),
        }

        Ok(Resolution::Applied(view))
    }

    /// Move to the following page.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when no next page exists.
    pub async fn next_page(&self) -> Result<Resolution<ListingView>, Error> {
        let (current, has_next) = {
            let view = self.view.borrow();
            (view.current_page, view.has_next)
        };
        if !has_next {
            return Err(Error::Validation("already on the last page".into()));
        }
        self.set_page(current + 1).await
    }

    /// Move to the preceding page.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when no previous page exists.
    pub async fn previous_page(&self) -> Result<Resolution<ListingView>, Error> {
        let (current, has_previous) = {
            let view = self.view.borrow();
            (view.current_page, view.has_previous)
        };
        if !has_previous {
            return Err(Error::Validation("already on the first page".into()));
        }
        self.set_page(current - 1).await
    }

    /// Drop the cached copy of the current page and fetch it again.
    pub async fn reload(&self) -> Result<Resolution<ListingView>, Error> {
        let page = {
            let view = self.view.borrow();
            if view.is_loaded() { view.current_page } else { view.requested_page.unwrap_or(1) }
        };
        self.cache.invalidate(&self.cache_key(page));
        self.set_page(page).await
    }

    fn validate_page(&self, page: u32) -> Result<(), Error> {
        if page == 0 {
            return Err(Error::Validation("page must be at least 1".into()));
        }
        let view = self.view.borrow();
        if view.is_loaded() && page > view.total_pages {
            return Err(Error::Validation(format!("page {page} is beyond the last page ({})", view.total_pages)));
        }
        Ok(())
    }

    async fn load_page(&self, page: u32) -> Result<Arc<Page<ContentItem>>, Error> {
        let source = Arc::clone(&self.source);
        let page_size = self.settings.page_size;
        self.cache
            .pages()
            .get(self.cache_key(page), self.settings.query, move || {
                let source = Arc::clone(&source);
                async move {
                    let loaded = source.fetch_page(page, page_size).await?;
                    if loaded.current_page != page {
                        return Err(Error::Validation(format!(
                            "page {page} is beyond the last page ({})",
                            loaded.total_pages
                        )));
                    }
                    Ok(Arc::new(loaded))
                }
            })
            .await
    }
}
