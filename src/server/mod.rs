//! MCP server for document search.
//!
//! This module exposes the workspace and the search executor to AI
//! assistants through the Model Context Protocol.

pub mod handlers;

pub use handlers::DocumentSearchServer;

use anyhow::Result;
use rmcp::transport::io::stdio;
use rmcp::ServiceExt;

/// Run the document search server with stdio transport.
///
/// Communicates via stdin/stdout using the MCP protocol and returns once the
/// client disconnects.
pub async fn run_server(server: DocumentSearchServer) -> Result<()> {
    let service = server.serve(stdio()).await?;

    service.waiting().await?;

    Ok(())
}
