//! MCP tool handlers for the document search server.
//!
//! This module implements all the MCP tools using the rmcp SDK's tool_router pattern.

use crate::executor::SearchExecutor;
use crate::host::Workspace;
use crate::models::{SearchMatch, SearchOptions};
use crate::observability::MetricsTracker;
use regex::RegexBuilder;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use schemars::JsonSchema;
use serde::Deserialize;
use std::borrow::Cow;
use std::sync::Arc;

/// The MCP server exposing the workspace's documents and the search executor.
#[derive(Clone)]
pub struct DocumentSearchServer {
    workspace: Arc<Workspace>,
    executor: Arc<SearchExecutor>,
    metrics: MetricsTracker,
    tool_router: ToolRouter<Self>,
}

// Implement ServerHandler using the tool_handler macro
#[tool_handler]
impl ServerHandler for DocumentSearchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities {
                tools: Some(Default::default()),
                ..Default::default()
            },
            server_info: Implementation {
                name: "document-search".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some("Incremental find-in-document: open documents, start a search on the active one, then step through matches with highlight_next / highlight_previous.".into()),
        }
    }
}

// Helper structs for tool parameters
#[derive(Debug, Deserialize, JsonSchema)]
struct OpenDocumentParams {
    path: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct DocumentIdParams {
    document_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct StartSearchParams {
    pattern: String,
    #[serde(default)]
    case_insensitive: Option<bool>,
    #[serde(default)]
    document_id: Option<String>,
}

// Helper function to convert errors to MCP errors
fn to_mcp_error(e: impl std::fmt::Display) -> McpError {
    McpError {
        code: ErrorCode::INTERNAL_ERROR,
        message: Cow::from(e.to_string()),
        data: None,
    }
}

fn invalid_params(e: impl std::fmt::Display) -> McpError {
    McpError {
        code: ErrorCode::INVALID_PARAMS,
        message: Cow::from(e.to_string()),
        data: None,
    }
}

fn match_json(m: &SearchMatch) -> serde_json::Value {
    serde_json::json!({
        "index": m.index,
        "text": m.text,
        "fragment": m.fragment,
        "location": m.location_label(),
    })
}

// Tool router implementation
#[tool_router]
impl DocumentSearchServer {
    /// Create a new document search server.
    pub fn new(
        workspace: Arc<Workspace>,
        executor: Arc<SearchExecutor>,
        metrics: MetricsTracker,
    ) -> Self {
        Self {
            workspace,
            executor,
            metrics,
            tool_router: Self::tool_router(),
        }
    }

    /// Open a file as a document and make it active.
    #[tool(
        description = "Open a file as a document and make it the active one. HTML files open as rendered documents, everything else as plain text."
    )]
    async fn open_document(
        &self,
        params: Parameters<OpenDocumentParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;

        let id = self
            .workspace
            .open_path(&params.path)
            .map_err(invalid_params)?;

        let info = self
            .workspace
            .list()
            .into_iter()
            .find(|doc| doc.id == id)
            .ok_or_else(|| to_mcp_error(format!("Document {} vanished after opening", id)))?;

        let json_response = serde_json::to_string_pretty(&info).map_err(to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(json_response)]))
    }

    /// Make an open document the active one.
    #[tool(description = "Make an open document the active one (the default search target)")]
    async fn activate_document(
        &self,
        params: Parameters<DocumentIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;

        self.workspace
            .activate(&params.document_id)
            .map_err(invalid_params)?;

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Activated {}",
            params.document_id
        ))]))
    }

    /// List open documents.
    #[tool(description = "List open documents and which one is active")]
    async fn list_documents(&self) -> Result<CallToolResult, McpError> {
        let json_response =
            serde_json::to_string_pretty(&self.workspace.list()).map_err(to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(json_response)]))
    }

    /// Start a search, replacing any search in progress.
    #[tool(
        description = "Search a document for a regular expression, highlighting every match and making the first one current. Searches the active document unless document_id is given. Ends any search already in progress."
    )]
    async fn start_search(
        &self,
        params: Parameters<StartSearchParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;

        tracing::debug!(
            pattern = %params.pattern,
            document_id = ?params.document_id,
            "MCP Handler: start_search called"
        );

        let query = RegexBuilder::new(&params.pattern)
            .case_insensitive(params.case_insensitive.unwrap_or(false))
            .build()
            .map_err(invalid_params)?;

        let mut options = SearchOptions::new(query);
        if let Some(id) = &params.document_id {
            let target = self.workspace.target_for(id).map_err(invalid_params)?;
            options = options.with_target(target);
        }

        let matches = self.executor.start_search(options).await.map_err(|e| {
            tracing::error!("Failed to start search: {}", e);
            to_mcp_error(e)
        })?;

        let status = self.executor.status();
        let json_response = serde_json::to_string_pretty(&serde_json::json!({
            "pattern": params.pattern,
            "provider": status.provider,
            "status": status.to_string(),
            "match_count": matches.len(),
            "matches": matches.iter().map(match_json).collect::<Vec<_>>(),
        }))
        .map_err(to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(json_response)]))
    }

    /// End the search in progress.
    #[tool(description = "End the search in progress and remove its highlights")]
    async fn end_search(&self) -> Result<CallToolResult, McpError> {
        let was_searching = self.executor.is_searching();

        self.executor.end_search().await.map_err(to_mcp_error)?;

        let message = if was_searching {
            "Search ended"
        } else {
            "No search in progress"
        };
        Ok(CallToolResult::success(vec![Content::text(message)]))
    }

    /// Advance to the next match.
    #[tool(description = "Move to the next match, wrapping from the last to the first")]
    async fn highlight_next(&self) -> Result<CallToolResult, McpError> {
        let current = self
            .executor
            .highlight_next()
            .await
            .map_err(to_mcp_error)?;
        self.navigation_result(current)
    }

    /// Step back to the previous match.
    #[tool(description = "Move to the previous match, wrapping from the first to the last")]
    async fn highlight_previous(&self) -> Result<CallToolResult, McpError> {
        let current = self
            .executor
            .highlight_previous()
            .await
            .map_err(to_mcp_error)?;
        self.navigation_result(current)
    }

    /// Report the search status.
    #[tool(
        description = "Report the current search: provider, \"N of M\" position, the current match, and session counters"
    )]
    async fn search_status(&self) -> Result<CallToolResult, McpError> {
        let status = self.executor.status();
        let current = status
            .current_index
            .and_then(|index| self.executor.matches().get(index).map(match_json));

        let json_response = serde_json::to_string_pretty(&serde_json::json!({
            "searching": status.searching,
            "provider": status.provider,
            "status": status.to_string(),
            "total_matches": status.total_matches,
            "current": current,
            "active_document": self.workspace.active_id(),
            "metrics": self.metrics.summary(),
        }))
        .map_err(to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(json_response)]))
    }

    fn navigation_result(&self, current: Option<SearchMatch>) -> Result<CallToolResult, McpError> {
        let status = self.executor.status();
        let json_response = serde_json::to_string_pretty(&serde_json::json!({
            "status": status.to_string(),
            "current": current.as_ref().map(match_json),
        }))
        .map_err(to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(json_response)]))
    }
}
