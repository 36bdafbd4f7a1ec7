//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;
use url::Url;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if `base_url` is empty, and
    /// `ConfigError::Invalid` if:
    /// - `base_url` is not an absolute http(s) URL
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `page_size` is outside 1..=100 or `window_size` outside 1..=25
    /// - `retries` exceeds 10 or `retry_delay_ms` exceeds one minute
    /// - `cache_capacity` is 0
    /// - `user_agent` or `site_name` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Missing {
                field: "base_url".into(),
                hint: "Set FOLIO_BASE_URL environment variable".into(),
            });
        }

        let base = Url::parse(&self.base_url).map_err(|e| invalid("base_url", e.to_string()))?;
        if base.scheme() != "http" && base.scheme() != "https" {
            return Err(invalid("base_url", "scheme must be http or https"));
        }

        if self.timeout_ms < 100 {
            return Err(invalid("timeout_ms", "must be at least 100ms"));
        }
        if self.timeout_ms > 300_000 {
            return Err(invalid("timeout_ms", "must not exceed 5 minutes (300000ms)"));
        }

        if self.page_size == 0 || self.page_size > 100 {
            return Err(invalid("page_size", "must be between 1 and 100"));
        }
        if self.window_size == 0 || self.window_size > 25 {
            return Err(invalid("window_size", "must be between 1 and 25"));
        }

        if self.retries > 10 {
            return Err(invalid("retries", "must not exceed 10"));
        }
        if self.retry_delay_ms > 60_000 {
            return Err(invalid("retry_delay_ms", "must not exceed 60000ms"));
        }

        if self.cache_capacity == 0 {
            return Err(invalid("cache_capacity", "must be greater than 0"));
        }

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }
        if self.site_name.trim().is_empty() {
            return Err(invalid("site_name", "must not be empty"));
        }

        if let Some(site_url) = &self.site_url {
            Url::parse(site_url).map_err(|e| invalid("site_url", e.to_string()))?;
        }

        if self.listing_ttl_secs == 0 || self.detail_ttl_secs == 0 {
            tracing::warn!(
                listing_ttl_secs = self.listing_ttl_secs,
                detail_ttl_secs = self.detail_ttl_secs,
                "a zero TTL makes every cached read stale; each read will trigger a background refresh"
            );
        }

        Ok(())
    }
}
