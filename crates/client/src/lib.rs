//! Client code for folio.
//!
//! This crate provides the HTTP client for the remote content service and
//! the normalization of its payloads into the core model. [`ContentClient`]
//! implements [`folio_core::ContentSource`], so controllers can use it
//! directly.

pub mod api;

pub use api::{ApiConfig, ApiError, ContentClient, ListingRequest};
