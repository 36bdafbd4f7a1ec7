//! Listing and detail controllers.
//!
//! Controllers own the view state the presentation layer renders. Each
//! request takes a ticket from a [`RequestGeneration`]; a result is applied
//! only while its ticket is still the newest, so out-of-order completions
//! never overwrite newer state. Superseded requests are not aborted, their
//! results simply land in the cache and are ignored here.

pub mod detail;
pub mod listing;

use std::sync::atomic::{AtomicU64, Ordering};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use detail::{DetailController, DetailView};
pub use listing::{ListingController, ListingSettings, ListingView};

/// Lifecycle of a view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
    NotFound,
}

/// Outcome of a controller request.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<V> {
    /// The result was applied; carries the view after the update.
    Applied(V),
    /// A newer request was issued before this one resolved.
    Superseded,
}

impl<V> Resolution<V> {
    pub fn applied(self) -> Option<V> {
        match self {
            Resolution::Applied(view) => Some(view),
            Resolution::Superseded => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, Resolution::Superseded)
    }
}

/// Signals sent to the presentation layer alongside view updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ControllerEvent {
    /// A page change completed; the listing should scroll back to the top.
    ScrollToTop { page: u32 },
}

/// Monotonic request counter used for last-request-wins ordering.
#[derive(Debug, Default)]
pub struct RequestGeneration(AtomicU64);

/// Identity of one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl RequestGeneration {
    /// Issue a ticket, superseding all earlier ones.
    pub fn begin(&self) -> Ticket {
        Ticket(self.0.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.0.load(Ordering::SeqCst) == ticket.0
    }
}
