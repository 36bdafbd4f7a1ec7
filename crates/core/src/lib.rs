//! Core types and shared functionality for folio.
//!
//! This crate provides:
//! - Content model and page arithmetic
//! - In-memory request cache with stale-while-revalidate reads
//! - Listing and detail controllers with last-request-wins ordering
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod pagination;
pub mod seo;
pub mod source;

pub use cache::{CacheKey, ContentCache, EntryState, QueryOptions, ResourceKind};
pub use config::{AppConfig, ConfigError};
pub use controller::{
    ControllerEvent, DetailController, DetailView, ListingController, ListingSettings, ListingView, Resolution, Status,
};
pub use error::{Error, ErrorInfo, ErrorKind};
pub use model::{ContentItem, Page};
pub use pagination::{PageToken, PageWindow, compute_window};
pub use seo::{SeoMeta, SiteInfo};
pub use source::ContentSource;
