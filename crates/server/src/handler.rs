//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::session::Session;
use crate::tools::cache::{CachePurgeParams, CacheStatusParams, purge_impl, status_impl};
use crate::tools::content_get::{ContentGetParams, get_impl};
use crate::tools::content_list::{ContentListParams, list_impl};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for folio.
#[derive(Clone)]
pub struct FolioServer {
    session: Arc<Session>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl FolioServer {
    /// Create a new server handler over a session.
    pub fn new(session: Arc<Session>) -> Self {
        Self { session, tool_router: Self::tool_router() }
    }

    #[tool(
        description = "List published content one page at a time. Returns the page's items, the pagination window and page metadata."
    )]
    async fn content_list(&self, params: Parameters<ContentListParams>) -> Result<CallToolResult, McpError> {
        list_impl(&self.session, params.0).await
    }

    #[tool(description = "Get a single published item by slug, with derived page metadata.")]
    async fn content_get(&self, params: Parameters<ContentGetParams>) -> Result<CallToolResult, McpError> {
        get_impl(&self.session, params.0).await
    }

    #[tool(description = "Purge cached content: everything, all listing pages, all items, one page or one slug.")]
    async fn cache_purge(&self, params: Parameters<CachePurgeParams>) -> Result<CallToolResult, McpError> {
        purge_impl(&self.session, params.0).await
    }

    #[tool(description = "Show the cache state (fresh, stale, fetching, failed) of one listing page or one slug.")]
    async fn cache_status(&self, params: Parameters<CacheStatusParams>) -> Result<CallToolResult, McpError> {
        status_impl(&self.session, params.0).await
    }
}

impl ServerHandler for FolioServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "folio-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::session;

    #[test]
    fn test_lists_all_tools() {
        let (_source, session) = session(1);
        let server = FolioServer::new(Arc::new(session));

        let mut names: Vec<String> = server.tool_router.list_all().into_iter().map(|t| t.name.to_string()).collect();
        names.sort();
        assert_eq!(names, vec!["cache_purge", "cache_status", "content_get", "content_list"]);
    }

    #[test]
    fn test_server_info() {
        let (_source, session) = session(1);
        let info = FolioServer::new(Arc::new(session)).get_info();
        assert_eq!(info.server_info.name, "folio-mcp");
    }
}
