//! Cache-related MCP tools.
//!
//! This module provides tools for inspecting and purging the session's
//! in-memory content cache.

pub mod purge;
pub mod status;

pub use purge::{CachePurgeParams, PurgeScope, purge_impl};
pub use status::{CacheStatusParams, status_impl};
