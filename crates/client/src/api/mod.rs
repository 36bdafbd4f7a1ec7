//! Content service API client.
//!
//! Provides read access to published content over HTTP and normalizes the
//! service's payloads into the core model.
//!
//! ### Endpoints
//!
//! - **Listing**: `GET {base}/api/blogs/published?page={n}&limit={m}`
//!   returns `{ blogs, totalPages, currentPage, totalItems }`.
//! - **Detail**: `GET {base}/api/blogs/slug/{slug}` returns `{ blog }` or a
//!   bare item. A 404 or `{ "blog": null }` means no such item.
//!
//! The client is stateless apart from connection reuse. It does not retry;
//! retries belong to the cache layer.

pub mod error;
pub mod request;
pub mod response;

pub use error::ApiError;
pub use request::{ListingRequest, MAX_PAGE_SIZE, validate_slug};
pub use response::{ListingResponse, WireItem, parse_detail};

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{StatusCode, header};
use url::Url;

use folio_core::{AppConfig, ContentItem, ContentSource, Error, Page};

/// Default base URL for the content service.
const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "folio/0.1";

const LISTING_PATH: [&str; 3] = ["api", "blogs", "published"];
const DETAIL_PATH: [&str; 3] = ["api", "blogs", "slug"];

/// Content client configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Service root; endpoint paths are appended to it.
    pub base_url: String,
    /// Request timeout (default: 20s).
    pub timeout: Duration,
    /// User-agent string (default: folio/0.x).
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl From<&AppConfig> for ApiConfig {
    fn from(config: &AppConfig) -> Self {
        Self { base_url: config.base_url.clone(), timeout: config.timeout(), user_agent: config.user_agent.clone() }
    }
}

/// Parse a service root, dropping any query or fragment.
pub fn parse_base_url(input: &str) -> Result<Url, ApiError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(ApiError::InvalidBaseUrl("empty URL".to_string()));
    }

    let mut parsed = Url::parse(trimmed).map_err(|e| ApiError::InvalidBaseUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(ApiError::InvalidBaseUrl(format!("unsupported scheme: {scheme}"))),
    }

    parsed.set_query(None);
    parsed.set_fragment(None);

    Ok(parsed)
}

/// HTTP client for the content service.
#[derive(Debug, Clone)]
pub struct ContentClient {
    http: reqwest::Client,
    base_url: Url,
    config: ApiConfig,
}

impl ContentClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let base_url = parse_base_url(&config.base_url)?;

        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| ApiError::Network(Arc::new(e)))?;

        Ok(Self { http, base_url, config })
    }

    /// Create a client from application configuration.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ApiError> {
        Self::new(ApiConfig::from(config))
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Listing endpoint, without query parameters.
    pub fn listing_url(&self) -> Result<Url, ApiError> {
        self.endpoint(&LISTING_PATH, None)
    }

    /// Detail endpoint for `slug`; the slug is percent-encoded as one segment.
    pub fn detail_url(&self, slug: &str) -> Result<Url, ApiError> {
        self.endpoint(&DETAIL_PATH, Some(slug))
    }

    fn endpoint(&self, segments: &[&str], last: Option<&str>) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidBaseUrl(format!("{} cannot be a base", self.base_url)))?;
            path.pop_if_empty().extend(segments);
            if let Some(last) = last {
                path.push(last);
            }
        }
        Ok(url)
    }

    /// Fetch one page of published items.
    pub async fn published(&self, req: ListingRequest) -> Result<Page<ContentItem>, ApiError> {
        req.validate()?;

        let url = self.listing_url()?;
        let start = Instant::now();
        tracing::debug!(page = req.page, limit = req.limit, "fetching listing page");

        let (status, bytes) = self.get(self.http.get(url).query(&req)).await?;
        if !status.is_success() {
            tracing::warn!(page = req.page, status = status.as_u16(), "listing request failed");
            return Err(ApiError::HttpError { status: status.as_u16() });
        }

        let response: ListingResponse = serde_json::from_slice(&bytes).map_err(|e| ApiError::Parse(e.to_string()))?;
        let page = response.into_page(req.page, req.limit);

        tracing::debug!(
            page = page.current_page,
            items = page.items.len(),
            total_pages = page.total_pages,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "listing page fetched"
        );

        Ok(page)
    }

    /// Fetch a single item by slug.
    pub async fn by_slug(&self, slug: &str) -> Result<ContentItem, ApiError> {
        let slug = validate_slug(slug)?;

        let url = self.detail_url(slug)?;
        let start = Instant::now();
        tracing::debug!(slug, "fetching item");

        let (status, bytes) = self.get(self.http.get(url)).await?;
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(slug.to_string()));
        }
        if !status.is_success() {
            tracing::warn!(slug, status = status.as_u16(), "detail request failed");
            return Err(ApiError::HttpError { status: status.as_u16() });
        }

        let item = parse_detail(&bytes)
            .map_err(|e| ApiError::Parse(e.to_string()))?
            .and_then(WireItem::into_item)
            .ok_or_else(|| ApiError::NotFound(slug.to_string()))?;

        tracing::debug!(slug, elapsed_ms = start.elapsed().as_millis() as u64, "item fetched");

        Ok(item)
    }

    async fn get(&self, request: reqwest::RequestBuilder) -> Result<(StatusCode, Bytes), ApiError> {
        let response = request
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| self.transport_error(e))?;

        Ok((status, bytes))
    }

    fn transport_error(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout(self.config.timeout.as_millis() as u64)
        } else {
            ApiError::Network(Arc::new(err))
        }
    }
}

#[async_trait]
impl ContentSource for ContentClient {
    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<Page<ContentItem>, Error> {
        Ok(self.published(ListingRequest::new(page, page_size)).await?)
    }

    async fn fetch_by_identifier(&self, identifier: &str) -> Result<ContentItem, Error> {
        Ok(self.by_slug(identifier).await?)
    }
}
