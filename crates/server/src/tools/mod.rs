//! MCP tool implementations.
//!
//! This module contains all tools exposed by the folio server.

pub mod cache;
pub mod content_get;
pub mod content_list;

pub use content_get::{ContentGetOutput, ContentGetParams};
pub use content_list::{ContentListOutput, ContentListParams};

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

/// Wrap a tool's output as pretty-printed JSON text content.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| McpError::internal_error(format!("Failed to serialize output: {e}"), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::ErrorCode;

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("no representation"))
        }
    }

    #[test]
    fn test_serialization_failure_is_internal_error() {
        let err = json_result(&Unserializable).unwrap_err();
        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
        assert!(err.message.contains("no representation"));
    }

    #[test]
    fn test_output_is_text_json() {
        let result = json_result(&serde_json::json!({"removed": 2})).unwrap();
        let out: serde_json::Value = crate::session::testing::output(&result);
        assert_eq!(out["removed"], 2);
    }
}
