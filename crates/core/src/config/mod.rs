//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (FOLIO_*)
//! 2. TOML config file (if FOLIO_CONFIG_FILE set)
//! 3. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::cache::QueryOptions;

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (FOLIO_*)
/// 2. TOML config file (if FOLIO_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the remote content service.
    ///
    /// Set via FOLIO_BASE_URL environment variable.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via FOLIO_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via FOLIO_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Number of items requested per listing page.
    ///
    /// Set via FOLIO_PAGE_SIZE environment variable.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Number of page links shown in the pagination window.
    ///
    /// Set via FOLIO_WINDOW_SIZE environment variable.
    #[serde(default = "default_window_size")]
    pub window_size: u32,

    /// Seconds a cached listing page stays fresh.
    ///
    /// Set via FOLIO_LISTING_TTL_SECS environment variable.
    #[serde(default = "default_listing_ttl_secs")]
    pub listing_ttl_secs: u64,

    /// Seconds a cached item stays fresh.
    ///
    /// Set via FOLIO_DETAIL_TTL_SECS environment variable.
    #[serde(default = "default_detail_ttl_secs")]
    pub detail_ttl_secs: u64,

    /// Retries after a transient failure (network, timeout, 5xx).
    ///
    /// Set via FOLIO_RETRIES environment variable.
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Base delay between retry attempts in milliseconds; grows linearly.
    ///
    /// Set via FOLIO_RETRY_DELAY_MS environment variable.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Maximum number of entries kept per cache before LRU eviction.
    ///
    /// Set via FOLIO_CACHE_CAPACITY environment variable.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Site name appended to derived page titles.
    ///
    /// Set via FOLIO_SITE_NAME environment variable.
    #[serde(default = "default_site_name")]
    pub site_name: String,

    /// Public site root used to build canonical item URLs.
    ///
    /// Set via FOLIO_SITE_URL environment variable.
    #[serde(default)]
    pub site_url: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:5000".into()
}

fn default_user_agent() -> String {
    "folio/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_page_size() -> u32 {
    6
}

fn default_window_size() -> u32 {
    5
}

fn default_listing_ttl_secs() -> u64 {
    300
}

fn default_detail_ttl_secs() -> u64 {
    600
}

fn default_retries() -> u32 {
    1
}

fn default_retry_delay_ms() -> u64 {
    250
}

fn default_cache_capacity() -> usize {
    256
}

fn default_site_name() -> String {
    "Folio".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            page_size: default_page_size(),
            window_size: default_window_size(),
            listing_ttl_secs: default_listing_ttl_secs(),
            detail_ttl_secs: default_detail_ttl_secs(),
            retries: default_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            cache_capacity: default_cache_capacity(),
            site_name: default_site_name(),
            site_url: None,
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Cache options for listing pages.
    pub fn listing_query(&self) -> QueryOptions {
        QueryOptions {
            ttl: Duration::from_secs(self.listing_ttl_secs),
            retries: self.retries,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
        }
    }

    /// Cache options for single items.
    pub fn detail_query(&self) -> QueryOptions {
        QueryOptions { ttl: Duration::from_secs(self.detail_ttl_secs), ..self.listing_query() }
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `FOLIO_`
    /// 2. TOML file from `FOLIO_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("FOLIO_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("FOLIO_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
