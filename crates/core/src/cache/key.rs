//! Cache keys: resource kind plus serialized request parameters.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Kind of remote resource a cache entry holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A page of item summaries.
    Listing,
    /// A single item looked up by slug.
    Detail,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Listing => "listing",
            ResourceKind::Detail => "detail",
        }
    }
}

/// Identity of a cached request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    kind: ResourceKind,
    params: String,
}

impl CacheKey {
    pub fn listing(page: u32, page_size: u32) -> Self {
        Self { kind: ResourceKind::Listing, params: format!("page={page}&limit={page_size}") }
    }

    pub fn detail(slug: &str) -> Self {
        Self { kind: ResourceKind::Detail, params: format!("slug={slug}") }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn params(&self) -> &str {
        &self.params
    }

    /// Stable SHA-256 hex digest of the key, for logs and diagnostics.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.kind.as_str().as_bytes());
        hasher.update(b"\n");
        hasher.update(self.params.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}?{}", self.kind.as_str(), self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_stability() {
        assert_eq!(CacheKey::listing(2, 6).digest(), CacheKey::listing(2, 6).digest());
    }

    #[test]
    fn test_digest_differs_by_params() {
        assert_ne!(CacheKey::listing(2, 6).digest(), CacheKey::listing(3, 6).digest());
        assert_ne!(CacheKey::listing(2, 6).digest(), CacheKey::listing(2, 10).digest());
    }

    #[test]
    fn test_digest_differs_by_kind() {
        let listing = CacheKey { kind: ResourceKind::Listing, params: "x".into() };
        let detail = CacheKey { kind: ResourceKind::Detail, params: "x".into() };
        assert_ne!(listing.digest(), detail.digest());
    }

    #[test]
    fn test_digest_format() {
        let digest = CacheKey::detail("hello-world").digest();
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_display() {
        assert_eq!(CacheKey::listing(1, 6).to_string(), "listing?page=1&limit=6");
        assert_eq!(CacheKey::detail("a-post").to_string(), "detail?slug=a-post");
    }
}
