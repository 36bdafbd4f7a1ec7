//! content_list tool implementation.
//!
//! Moves the listing to a page and returns what a reader would see: the
//! page's cards, the pagination controls and the page metadata.

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use folio_core::{ContentItem, ListingView, PageWindow, Resolution, SeoMeta};

use crate::session::Session;
use crate::tools::json_result;

/// Input parameters for content_list tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ContentListParams {
    /// 1-indexed page to show. Defaults to the current page, or 1 before
    /// anything has been listed.
    #[serde(default)]
    pub page: Option<u32>,
}

/// Summary of one item as shown on a listing card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ContentCard {
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub date: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub featured: bool,
}

impl From<&ContentItem> for ContentCard {
    fn from(item: &ContentItem) -> Self {
        Self {
            slug: item.slug.clone(),
            title: item.title.clone(),
            excerpt: item.excerpt.clone(),
            author: item.author_name().map(str::to_string),
            date: item.display_date(),
            tags: item.card_tags().to_vec(),
            image: item.media.as_ref().map(|m| m.url.clone()),
            featured: item.featured,
        }
    }
}

/// Output structure for content_list tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ContentListOutput {
    pub listing: ListingView,
    pub cards: Vec<ContentCard>,
    /// Pagination controls with first/last page and gap markers; absent
    /// when everything fits on one page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PageWindow>,
    pub meta: SeoMeta,
    /// True when a newer listing request finished first; `listing` then
    /// shows that request's state.
    pub superseded: bool,
}

/// Implementation of the content_list tool.
pub async fn list_impl(session: &Session, params: ContentListParams) -> Result<CallToolResult, McpError> {
    let page = match params.page {
        Some(page) => page,
        None => {
            let view = session.listing.view();
            if view.window.is_some() { view.current_page } else { 1 }
        }
    };

    let (listing, superseded) = match session.listing.set_page(page).await? {
        Resolution::Applied(view) => (view, false),
        Resolution::Superseded => (session.listing.view(), true),
    };

    let cards = listing.items.iter().map(ContentCard::from).collect();
    let pagination = listing.window.clone().filter(|_| listing.show_pagination).map(PageWindow::with_edges);
    let meta = SeoMeta::for_listing(&session.site, listing.current_page);

    let output = ContentListOutput { listing, cards, pagination, meta, superseded };
    json_result(&output)
}
