//! Document Search - pluggable incremental find-in-document.
//!
//! A search executor drives one search session at a time against whichever
//! provider claims the content being searched. Providers locate and
//! highlight matches; the executor sequences their lifecycle and re-publishes
//! their change notifications to the UI.
//!
//! # Architecture
//!
//! - **executor**: The single-session state machine (`Idle` / `Searching`)
//! - **registry**: Ordered provider list, first claim wins
//! - **providers**: The provider contract plus the built-in text editor and
//!   rendered document providers
//! - **content**: Searchable content types the built-in providers bind to
//! - **models**: Match and search option value types
//! - **signal**: Payload-free change notification with connect/disconnect
//! - **target**: Type-erased handle to the content being searched
//! - **host**: The active-content seam and the bundled document workspace
//! - **observability**: Lifecycle counters and operation timing
//! - **error**: Custom error types for precise error handling
//! - **config**: Configuration management from environment variables
//! - **server**: MCP protocol server exposing the workspace and executor

pub mod config;
pub mod content;
pub mod error;
pub mod executor;
pub mod host;
pub mod models;
pub mod observability;
pub mod providers;
pub mod registry;
pub mod server;
pub mod signal;
pub mod target;

// Re-export commonly used types
pub use config::{Config, SearchConfig};
pub use content::{RenderedDocument, SearchableContent, TextEditor};
pub use error::{ConfigError, SearchError, SearchResult, WorkspaceError};
pub use executor::{SearchExecutor, SearchStatus};
pub use host::{ActiveContent, DocumentInfo, DocumentKind, Workspace};
pub use models::{SearchMatch, SearchOptions};
pub use observability::MetricsTracker;
pub use providers::{RenderedDocumentProvider, SearchProvider, TextEditorProvider};
pub use registry::SearchProviderRegistry;
pub use server::DocumentSearchServer;
pub use signal::{ChangedSignal, SubscriptionId};
pub use target::SearchTarget;
