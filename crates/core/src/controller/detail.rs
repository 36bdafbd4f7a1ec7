//! Single-item controller.

use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use super::{RequestGeneration, Resolution, Status};
use crate::cache::{CacheKey, ContentCache, QueryOptions};
use crate::error::{Error, ErrorInfo};
use crate::model::ContentItem;
use crate::seo::{SeoMeta, SiteInfo};
use crate::source::ContentSource;

/// What the presentation layer renders for a single item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DetailView {
    pub status: Status,
    /// Slug of the most recent request.
    pub slug: Option<String>,
    pub item: Option<ContentItem>,
    pub meta: Option<SeoMeta>,
    pub error: Option<ErrorInfo>,
}

/// Loads one item by slug through the cache.
pub struct DetailController {
    source: Arc<dyn ContentSource>,
    cache: ContentCache,
    query: QueryOptions,
    site: SiteInfo,
    generation: RequestGeneration,
    view: watch::Sender<DetailView>,
}

impl DetailController {
    pub fn new(source: Arc<dyn ContentSource>, cache: ContentCache, query: QueryOptions, site: SiteInfo) -> Self {
        let (view, _) = watch::channel(DetailView::default());
        Self { source, cache, query, site, generation: RequestGeneration::default(), view }
    }

    pub fn view(&self) -> DetailView {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailView> {
        self.view.subscribe()
    }

    /// Load the item named by `slug`.
    ///
    /// A missing item moves the view to [`Status::NotFound`] and clears the
    /// previous item.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty slug; nothing is fetched.
    pub async fn load(&self, slug: &str) -> Result<Resolution<DetailView>, Error> {
        let slug = slug.trim();
        if slug.is_empty() {
            return Err(Error::Validation("slug must not be empty".into()));
        }

        let ticket = self.generation.begin();
        self.view.send_if_modified(|view| {
            if !self.generation.is_current(ticket) {
                return false;
            }
            view.status = Status::Loading;
            view.slug = Some(slug.to_string());
            view.error = None;
            true
        });

        let result = self.fetch(slug).await;

        let mut applied = None;
        self.view.send_if_modified(|view| {
            if !self.generation.is_current(ticket) {
                return false;
            }
            match &result {
                Ok(item) => {
                    view.status = Status::Ready;
                    view.meta = Some(SeoMeta::for_item(item, &self.site));
                    view.item = Some(ContentItem::clone(item));
                    view.error = None;
                }
                Err(err @ Error::NotFound(_)) => {
                    view.status = Status::NotFound;
                    view.item = None;
                    view.meta = None;
                    view.error = Some(ErrorInfo::from(err));
                }
                Err(err) => {
                    view.status = Status::Error;
                    view.error = Some(ErrorInfo::from(err));
                }
            }
            applied = Some(view.clone());
            true
        });

        match (&applied, &result) {
            (None, _) => tracing::debug!(slug, "discarding result of superseded detail request"),
            (Some(_), Ok(_)) => tracing::debug!(slug, "detail ready"),
            (Some(_), Err(err)) => tracing::warn!(slug, error = %err, "detail failed"),
        }

        Ok(applied.map_or(Resolution::Superseded, Resolution::Applied))
    }

    /// Drop the cached copy of the current item and fetch it again.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when nothing has been requested yet.
    pub async fn reload(&self) -> Result<Resolution<DetailView>, Error> {
        let slug = self.view.borrow().slug.clone();
        let Some(slug) = slug else {
            return Err(Error::Validation("no item has been requested".into()));
        };
        self.cache.invalidate(&CacheKey::detail(&slug));
        self.load(&slug).await
    }

    async fn fetch(&self, slug: &str) -> Result<Arc<ContentItem>, Error> {
        let source = Arc::clone(&self.source);
        let identifier = slug.to_string();
        self.cache
            .items()
            .get(CacheKey::detail(slug), self.query, move || {
                let source = Arc::clone(&source);
                let identifier = identifier.clone();
                async move { source.fetch_by_identifier(&identifier).await.map(Arc::new) }
            })
            .await
    }
}
