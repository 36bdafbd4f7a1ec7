//! cache_status tool implementation.
//!
//! Reports the lifecycle state of one cache entry.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use folio_core::{CacheKey, EntryState, Error};

use crate::session::Session;
use crate::tools::json_result;

/// Parameters for the cache_status tool. Exactly one of `page` or `slug`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CacheStatusParams {
    /// Listing page to inspect.
    #[serde(default)]
    pub page: Option<u32>,

    /// Item slug to inspect.
    #[serde(default)]
    pub slug: Option<String>,
}

/// Output from the cache_status tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheStatusOutput {
    /// Human-readable cache key.
    pub key: String,
    /// SHA-256 digest of the key.
    pub digest: String,
    /// Entry state; absent when nothing is cached for the key.
    pub state: Option<EntryState>,
    /// Total entries in the cache.
    pub entries: usize,
    /// Entry bound per resource kind.
    pub capacity: usize,
}

/// Implementation of the cache_status tool.
pub async fn status_impl(session: &Session, params: CacheStatusParams) -> Result<CallToolResult, McpError> {
    let key = match (params.page, params.slug.as_deref().map(str::trim)) {
        (Some(page), None) => CacheKey::listing(page, session.page_size()),
        (None, Some(slug)) if !slug.is_empty() => CacheKey::detail(slug),
        _ => return Err(Error::Validation("exactly one of page or slug must be specified".to_string()).into()),
    };

    let output = CacheStatusOutput {
        key: key.to_string(),
        digest: key.digest(),
        state: session.cache.entry_state(&key),
        entries: session.cache.len(),
        capacity: session.cache.capacity(),
    };
    json_result(&output)
}
