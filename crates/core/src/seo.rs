//! Display and search-metadata derivations for content items.

use schemars::JsonSchema;
use scraper::Html;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::AppConfig;
use crate::model::ContentItem;

const WORDS_PER_MINUTE: usize = 200;
const DESCRIPTION_MAX_CHARS: usize = 160;
const CARD_TAG_LIMIT: usize = 3;

impl ContentItem {
    pub fn author_name(&self) -> Option<&str> {
        self.author.as_ref().map(|a| a.name.as_str()).filter(|name| !name.is_empty())
    }

    /// Publish date in long US form ("March 4, 2025"), or "No date".
    pub fn display_date(&self) -> String {
        match self.published_at {
            Some(at) => at.format("%B %-d, %Y").to_string(),
            None => "No date".to_string(),
        }
    }

    /// Tags shown on a summary card.
    pub fn card_tags(&self) -> &[String] {
        &self.tags[..self.tags.len().min(CARD_TAG_LIMIT)]
    }

    /// Body with markup removed and whitespace collapsed.
    pub fn body_text(&self) -> Option<String> {
        let body = self.body.as_deref()?;
        let fragment = Html::parse_fragment(body);
        let text = fragment.root_element().text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ");
        (!text.is_empty()).then_some(text)
    }

    pub fn word_count(&self) -> usize {
        self.body_text().map(|t| t.split_whitespace().count()).unwrap_or(0)
    }

    /// Estimated reading time in whole minutes, at least one.
    pub fn reading_minutes(&self) -> usize {
        self.word_count().div_ceil(WORDS_PER_MINUTE).max(1)
    }
}

/// Site identity used when deriving page metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteInfo {
    pub name: String,
    pub url: Option<String>,
}

impl From<&AppConfig> for SiteInfo {
    fn from(config: &AppConfig) -> Self {
        Self { name: config.site_name.clone(), url: config.site_url.clone() }
    }
}

/// Document metadata for a rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SeoMeta {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub keywords: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn truncate_words(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    let cut = match cut.rfind(char::is_whitespace) {
        Some(idx) if idx > 0 => &cut[..idx],
        _ => cut.as_str(),
    };
    format!("{}...", cut.trim_end())
}

impl SeoMeta {
    pub fn for_item(item: &ContentItem, site: &SiteInfo) -> Self {
        let title = non_empty(Some(item.title.as_str())).unwrap_or("Blog Post");

        let description = non_empty(item.meta_description.as_deref())
            .or_else(|| non_empty(item.excerpt.as_deref()))
            .map(str::to_string)
            .or_else(|| item.body_text().map(|text| truncate_words(&text, DESCRIPTION_MAX_CHARS)))
            .unwrap_or_default();

        let keywords = if item.meta_keywords.is_empty() { &item.tags } else { &item.meta_keywords };

        Self {
            title: format!("{title} - {}", site.name),
            description,
            keywords: keywords.join(", "),
            image: item.media.as_ref().map(|m| m.url.clone()),
            canonical_url: site.url.as_deref().and_then(|root| canonical_url(root, &item.slug)),
        }
    }

    pub fn for_listing(site: &SiteInfo, page: u32) -> Self {
        let title = if page > 1 { format!("Blog - Page {page} - {}", site.name) } else { format!("Blog - {}", site.name) };
        Self {
            title,
            description: format!("Insights, trends and expert perspectives from {}.", site.name),
            keywords: String::new(),
            image: None,
            canonical_url: None,
        }
    }
}

fn canonical_url(root: &str, slug: &str) -> Option<String> {
    let mut url = Url::parse(root).ok()?;
    url.path_segments_mut().ok()?.pop_if_empty().push("blog").push(slug);
    Some(url.to_string())
}
