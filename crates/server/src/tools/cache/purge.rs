//! cache_purge tool implementation.
//!
//! Purges cache entries for everything, one resource kind, or one key.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use folio_core::{CacheKey, Error, ResourceKind};

use crate::session::Session;
use crate::tools::json_result;

/// Which entries to purge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PurgeScope {
    All,
    Listing,
    Detail,
}

/// Parameters for the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeParams {
    /// Purge scope: "all", "listing" or "detail".
    pub scope: PurgeScope,

    /// With scope "listing", purge only this page.
    #[serde(default)]
    pub page: Option<u32>,

    /// With scope "detail", purge only this slug.
    #[serde(default)]
    pub slug: Option<String>,
}

/// Output from the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeOutput {
    /// Number of entries removed.
    pub removed: usize,
    /// Entries left in the cache.
    pub remaining: usize,
}

/// Implementation of the cache_purge tool.
pub async fn purge_impl(session: &Session, params: CachePurgeParams) -> Result<CallToolResult, McpError> {
    let cache = &session.cache;

    let removed = match (params.scope, params.page, params.slug.as_deref()) {
        (PurgeScope::All, None, None) => cache.clear(),
        (PurgeScope::Listing, None, None) => cache.invalidate_kind(ResourceKind::Listing),
        (PurgeScope::Listing, Some(page), None) => {
            usize::from(cache.invalidate(&CacheKey::listing(page, session.page_size())))
        }
        (PurgeScope::Detail, None, None) => cache.invalidate_kind(ResourceKind::Detail),
        (PurgeScope::Detail, None, Some(slug)) => usize::from(cache.invalidate(&CacheKey::detail(slug.trim()))),
        _ => {
            return Err(Error::Validation(
                "page is only valid with scope \"listing\" and slug only with scope \"detail\"".to_string(),
            )
            .into());
        }
    };

    tracing::info!(scope = ?params.scope, removed, "cache purged");

    let output = CachePurgeOutput { removed, remaining: cache.len() };
    json_result(&output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::{output, session};
    use rmcp::model::ErrorCode;

    async fn warm(session: &Session) {
        session.listing.set_page(1).await.unwrap();
        session.listing.set_page(2).await.unwrap();
        session.detail.load("post-1").await.unwrap();
    }

    fn params(scope: PurgeScope, page: Option<u32>, slug: Option<&str>) -> CachePurgeParams {
        CachePurgeParams { scope, page, slug: slug.map(str::to_string) }
    }

    #[tokio::test]
    async fn test_purge_all() {
        let (_source, session) = session(20);
        warm(&session).await;

        let result = purge_impl(&session, params(PurgeScope::All, None, None)).await.unwrap();
        let out: CachePurgeOutput = output(&result);
        assert_eq!(out.removed, 3);
        assert_eq!(out.remaining, 0);
    }

    #[tokio::test]
    async fn test_purge_listing_page() {
        let (source, session) = session(20);
        warm(&session).await;

        let result = purge_impl(&session, params(PurgeScope::Listing, Some(2), None)).await.unwrap();
        let out: CachePurgeOutput = output(&result);
        assert_eq!(out.removed, 1);
        assert_eq!(out.remaining, 2);

        let before = source.calls();
        session.listing.set_page(2).await.unwrap();
        assert_eq!(source.calls(), before + 1);
    }

    #[tokio::test]
    async fn test_purge_detail_kind() {
        let (_source, session) = session(20);
        warm(&session).await;

        let result = purge_impl(&session, params(PurgeScope::Detail, None, None)).await.unwrap();
        let out: CachePurgeOutput = output(&result);
        assert_eq!(out.removed, 1);
        assert_eq!(out.remaining, 2);
    }

    #[tokio::test]
    async fn test_purge_missing_slug_removes_nothing() {
        let (_source, session) = session(20);
        warm(&session).await;

        let result = purge_impl(&session, params(PurgeScope::Detail, None, Some("post-9"))).await.unwrap();
        let out: CachePurgeOutput = output(&result);
        assert_eq!(out.removed, 0);
    }

    #[tokio::test]
    async fn test_purge_mismatched_params() {
        let (_source, session) = session(20);

        let err = purge_impl(&session, params(PurgeScope::Detail, Some(1), None)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode(-32602));

        let err = purge_impl(&session, params(PurgeScope::All, None, Some("post-1"))).await.unwrap_err();
        assert_eq!(err.code, ErrorCode(-32602));
    }
}
