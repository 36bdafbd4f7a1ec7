//! Content service response types and normalization.
//!
//! The service is loose about its payloads: ids arrive as `_id`, the author
//! may sit under `author` or a populated `authorId`, references may be bare
//! id strings, and dates come as ISO strings, plain dates or epoch millis.
//! Everything here deserializes leniently and normalizes into the core model.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Deserialize;
use serde_json::Value;

use folio_core::model::{Author, Category, Media};
use folio_core::{ContentItem, Page};

/// Raw response from the published listing endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingResponse {
    #[serde(alias = "items", alias = "posts")]
    pub blogs: Option<Vec<WireItem>>,
    pub total_pages: Option<u32>,
    pub current_page: Option<u32>,
    #[serde(alias = "total", alias = "totalBlogs")]
    pub total_items: Option<u64>,
}

/// Individual item as sent by the service.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireItem {
    #[serde(rename = "_id", alias = "id")]
    pub id: Option<String>,
    pub slug: Option<String>,
    pub title: Option<String>,
    pub excerpt: Option<String>,
    #[serde(alias = "body")]
    pub content: Option<String>,
    #[serde(alias = "publishedAt", alias = "createdAt")]
    pub publish_date: Option<WireDate>,
    pub author: Option<WireRef>,
    pub author_id: Option<WireRef>,
    pub tags: Option<Vec<String>>,
    pub image_url: Option<String>,
    pub image_alt: Option<String>,
    pub is_featured: Option<bool>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<Keywords>,
    pub category_id: Option<WireRef>,
}

/// A reference that is either populated or just an id.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum WireRef {
    Populated {
        #[serde(rename = "_id", alias = "id", default)]
        id: Option<String>,
        #[serde(default)]
        name: Option<String>,
    },
    Id(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum WireDate {
    Text(String),
    Millis(i64),
}

/// Keywords as a list or a comma-separated string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Keywords {
    List(Vec<String>),
    Text(String),
}

impl WireRef {
    fn id(&self) -> Option<String> {
        match self {
            WireRef::Populated { id, .. } => id.clone(),
            WireRef::Id(id) => Some(id.clone()),
        }
    }

    fn name(&self) -> Option<&str> {
        match self {
            WireRef::Populated { name, .. } => name.as_deref().map(str::trim).filter(|n| !n.is_empty()),
            WireRef::Id(_) => None,
        }
    }
}

impl WireDate {
    /// Parse the date; unusable values yield `None`.
    pub fn parse(&self) -> Option<DateTime<Utc>> {
        match self {
            WireDate::Text(text) => {
                let text = text.trim();
                DateTime::parse_from_rfc3339(text)
                    .map(|dt| dt.with_timezone(&Utc))
                    .ok()
                    .or_else(|| {
                        NaiveDate::parse_from_str(text, "%Y-%m-%d")
                            .ok()
                            .and_then(|d| d.and_hms_opt(0, 0, 0))
                            .map(|dt| dt.and_utc())
                    })
            }
            WireDate::Millis(ms) => Utc.timestamp_millis_opt(*ms).single(),
        }
    }
}

impl Keywords {
    fn into_vec(self) -> Vec<String> {
        let words: Vec<String> = match self {
            Keywords::List(list) => list,
            Keywords::Text(text) => text.split(',').map(str::to_string).collect(),
        };
        words.into_iter().map(|w| w.trim().to_string()).filter(|w| !w.is_empty()).collect()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl WireItem {
    /// Normalize into a [`ContentItem`]; items without a slug are unusable.
    pub fn into_item(self) -> Option<ContentItem> {
        let slug = non_blank(self.slug)?.trim().to_string();

        let published_at = self.publish_date.as_ref().and_then(|date| {
            let parsed = date.parse();
            if parsed.is_none() {
                tracing::warn!(slug = %slug, value = ?date, "unparseable publish date");
            }
            parsed
        });

        let author = self.author.as_ref().or(self.author_id.as_ref()).and_then(|author| {
            author.name().map(|name| Author { id: author.id(), name: name.to_string() })
        });

        let category = self
            .category_id
            .as_ref()
            .and_then(|category| category.name().map(|name| Category { id: category.id(), name: name.to_string() }));

        let media = non_blank(self.image_url).map(|url| Media { url, alt: non_blank(self.image_alt) });

        Some(ContentItem {
            id: self.id,
            slug,
            title: self.title.unwrap_or_default(),
            excerpt: non_blank(self.excerpt),
            body: non_blank(self.content),
            published_at,
            author,
            tags: self.tags.unwrap_or_default(),
            media,
            featured: self.is_featured.unwrap_or(false),
            meta_description: non_blank(self.meta_description),
            meta_keywords: self.meta_keywords.map(Keywords::into_vec).unwrap_or_default(),
            category,
        })
    }
}

impl ListingResponse {
    /// Normalize into a [`Page`] for the requested page and size.
    pub fn into_page(self, requested_page: u32, page_size: u32) -> Page<ContentItem> {
        let raw = self.blogs.unwrap_or_default();
        let received = raw.len();
        let items: Vec<ContentItem> = raw.into_iter().filter_map(WireItem::into_item).collect();
        if items.len() != received {
            tracing::warn!(dropped = received - items.len(), page = requested_page, "listing items without slug");
        }

        let current_page = self.current_page.unwrap_or(requested_page);
        if current_page != requested_page {
            tracing::debug!(requested_page, current_page, "service answered with a different page");
        }

        Page::from_remote(items, current_page, page_size, self.total_items, self.total_pages)
    }
}

/// Parse a detail payload, accepting `{ "blog": {...} }` or a bare item.
///
/// Returns `Ok(None)` when the payload says there is no such item.
pub fn parse_detail(bytes: &[u8]) -> Result<Option<WireItem>, serde_json::Error> {
    let value: Value = serde_json::from_slice(bytes)?;
    let item = match value {
        Value::Null => return Ok(None),
        Value::Object(mut map) if map.contains_key("blog") => match map.remove("blog") {
            Some(Value::Null) | None => return Ok(None),
            Some(inner) => inner,
        },
        other => other,
    };
    serde_json::from_value(item).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    const LISTING: &str = r#"{
        "blogs": [
            {
                "_id": "66a1",
                "slug": "first-post",
                "title": "First Post",
                "excerpt": "Intro",
                "publishDate": "2025-03-04T10:00:00.000Z",
                "author": { "_id": "u1", "name": "Ada" },
                "tags": ["rust", "web", "async", "cache"],
                "imageUrl": "https://cdn.example.com/1.png",
                "imageAlt": "Cover",
                "isFeatured": true,
                "categoryId": { "_id": "c1", "name": "Engineering" }
            },
            {
                "_id": "66a2",
                "slug": "second-post",
                "title": "Second Post",
                "publishDate": "not a date",
                "authorId": { "_id": "u2", "name": "Grace" },
                "tags": null
            },
            { "_id": "66a3", "title": "No slug" }
        ],
        "totalPages": 4,
        "currentPage": 2,
        "totalItems": 20
    }"#;

    #[test]
    fn test_listing_normalization() {
        let response: ListingResponse = serde_json::from_str(LISTING).unwrap();
        let page = response.into_page(2, 6);

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.total_items, 20);
        assert_eq!(page.total_pages, 4);

        let first = &page.items[0];
        assert_eq!(first.id.as_deref(), Some("66a1"));
        assert_eq!(first.author.as_ref().map(|a| a.name.as_str()), Some("Ada"));
        assert_eq!(first.published_at.map(|d| (d.year(), d.month(), d.day())), Some((2025, 3, 4)));
        assert_eq!(first.tags.len(), 4);
        assert!(first.featured);
        assert_eq!(first.media.as_ref().and_then(|m| m.alt.as_deref()), Some("Cover"));
        assert_eq!(first.category.as_ref().map(|c| c.name.as_str()), Some("Engineering"));

        let second = &page.items[1];
        assert_eq!(second.author.as_ref().map(|a| a.name.as_str()), Some("Grace"));
        assert!(second.published_at.is_none());
        assert!(second.tags.is_empty());
        assert!(!second.featured);
    }

    #[test]
    fn test_listing_without_totals_is_single_page() {
        let response: ListingResponse = serde_json::from_str(r#"{ "blogs": [{ "slug": "a" }] }"#).unwrap();
        let page = response.into_page(1, 6);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.total_items, 1);
    }

    #[test]
    fn test_listing_empty() {
        let response: ListingResponse =
            serde_json::from_str(r#"{ "blogs": [], "totalPages": 0, "totalItems": 0 }"#).unwrap();
        let page = response.into_page(1, 6);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.current_page, 1);
    }

    #[test]
    fn test_unpopulated_references() {
        let item: WireItem =
            serde_json::from_str(r#"{ "slug": "a", "authorId": "u9", "categoryId": "c9" }"#).unwrap();
        let item = item.into_item().unwrap();
        assert!(item.author.is_none());
        assert!(item.category.is_none());
    }

    #[test]
    fn test_keywords_forms() {
        let item: WireItem = serde_json::from_str(r#"{ "slug": "a", "metaKeywords": "rust, , web " }"#).unwrap();
        assert_eq!(item.into_item().unwrap().meta_keywords, vec!["rust", "web"]);

        let item: WireItem = serde_json::from_str(r#"{ "slug": "a", "metaKeywords": ["x", "y"] }"#).unwrap();
        assert_eq!(item.into_item().unwrap().meta_keywords, vec!["x", "y"]);
    }

    #[test]
    fn test_date_forms() {
        let plain = WireDate::Text("2024-12-25".into()).parse().unwrap();
        assert_eq!((plain.year(), plain.month(), plain.day()), (2024, 12, 25));

        let millis = WireDate::Millis(0).parse().unwrap();
        assert_eq!(millis.year(), 1970);

        assert!(WireDate::Text("yesterday".into()).parse().is_none());
    }

    #[test]
    fn test_parse_detail_wrapped_and_bare() {
        let wrapped = parse_detail(br#"{ "blog": { "slug": "a", "title": "A", "content": "<p>x</p>" } }"#).unwrap();
        let item = wrapped.and_then(WireItem::into_item).unwrap();
        assert_eq!(item.body.as_deref(), Some("<p>x</p>"));

        let bare = parse_detail(br#"{ "slug": "b", "title": "B" }"#).unwrap();
        assert_eq!(bare.and_then(WireItem::into_item).map(|i| i.slug), Some("b".to_string()));
    }

    #[test]
    fn test_parse_detail_missing() {
        assert!(parse_detail(br#"{ "blog": null }"#).unwrap().is_none());
        assert!(parse_detail(b"null").unwrap().is_none());
        assert!(parse_detail(b"{ not json").is_err());
    }
}
