//! Document Search - Main entry point
//!
//! Serves the document workspace and search executor over the Model Context
//! Protocol on stdio.

use anyhow::Result;
use document_search::{
    Config, DocumentSearchServer, MetricsTracker, SearchExecutor, SearchProviderRegistry,
    Workspace,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load configuration first so LOG_LEVEL can seed the filter
    let config = Config::from_env();
    let fallback_level = config
        .as_ref()
        .map(|cfg| cfg.log_level.clone())
        .unwrap_or_else(|_| "error".to_string());

    // Initialize logging (stderr only to avoid polluting stdout/MCP communication)
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&fallback_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match config {
        Ok(cfg) => {
            info!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    info!(
        "Starting document search with root: {}",
        config.document_root.display()
    );

    let registry = Arc::new(SearchProviderRegistry::with_default_providers(
        config.search_config(),
    ));
    info!("Registered providers: {:?}", registry.provider_names());

    let workspace = Arc::new(Workspace::new(config.document_root.clone()));
    let metrics = MetricsTracker::new();
    let executor = Arc::new(
        SearchExecutor::new(registry, workspace.clone()).with_metrics(metrics.clone()),
    );

    let server = DocumentSearchServer::new(workspace, executor, metrics.clone());

    // Run the server (this will block until the server exits)
    info!("Starting MCP server with stdio transport");
    document_search::server::run_server(server).await?;

    info!("{}", metrics.summary());
    info!("Document search shutdown complete");
    Ok(())
}
