//! content_get tool implementation.
//!
//! Loads a single item by slug. A missing item is a successful call whose
//! view has status `not_found`.

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use folio_core::{DetailView, Resolution};

use crate::session::Session;
use crate::tools::json_result;

/// Input parameters for content_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ContentGetParams {
    /// Slug of the item to load.
    pub slug: String,
}

/// Output structure for content_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ContentGetOutput {
    pub detail: DetailView,
    /// Estimated reading time, when the item has a body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading_minutes: Option<usize>,
    /// Publish date as displayed to readers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_date: Option<String>,
    pub superseded: bool,
}

/// Implementation of the content_get tool.
pub async fn get_impl(session: &Session, params: ContentGetParams) -> Result<CallToolResult, McpError> {
    let (detail, superseded) = match session.detail.load(&params.slug).await? {
        Resolution::Applied(view) => (view, false),
        Resolution::Superseded => (session.detail.view(), true),
    };

    let reading_minutes = detail.item.as_ref().filter(|item| item.body.is_some()).map(|item| item.reading_minutes());
    let display_date = detail.item.as_ref().map(|item| item.display_date());

    let output = ContentGetOutput { detail, reading_minutes, display_date, superseded };
    json_result(&output)
}
