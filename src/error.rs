//! Error types for document search.
//!
//! This module defines custom error types using `thiserror` for precise error handling.

use thiserror::Error;

/// Errors that can occur while driving a search session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// No registered provider claims the target
    #[error("No search provider found for target: {target}")]
    NoProviderFound { target: String },

    /// No explicit target was given and the host has no active content
    #[error("No active content to search")]
    NoActiveTarget,

    /// Operation is not valid in the executor's current state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A provider's own search or navigation operation failed
    #[error("Provider '{provider}' failed: {message}")]
    ProviderFailure { provider: String, message: String },
}

impl SearchError {
    /// Build a provider failure for the named provider.
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProviderFailure {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Whether this error originated inside a provider.
    pub fn is_provider_failure(&self) -> bool {
        matches!(self, Self::ProviderFailure { .. })
    }
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

/// Errors raised by the host workspace when opening or selecting documents.
#[derive(Error, Debug)]
pub enum WorkspaceError {
    /// Document file could not be read
    #[error("Failed to read document {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// No open document has the given id
    #[error("Document not found: {0}")]
    NotFound(String),

    /// A writer panicked while holding the workspace state
    #[error("Workspace state lock poisoned")]
    LockPoisoned,
}

/// Convenience type alias for Results with SearchError
pub type SearchResult<T> = Result<T, SearchError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Convenience type alias for Results with WorkspaceError
pub type WorkspaceResult<T> = Result<T, WorkspaceError>;
