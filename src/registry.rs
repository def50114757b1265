//! Registry of search providers.
//!
//! Decouples "what can search this content" from "how to search it": the
//! registry only answers which provider claims a target, it never holds
//! session state.

use crate::config::SearchConfig;
use crate::providers::{RenderedDocumentProvider, SearchProvider, TextEditorProvider};
use crate::target::SearchTarget;
use std::fmt;
use std::sync::Arc;

/// Ordered set of registered providers.
///
/// When several providers claim the same target the one registered first
/// wins.
pub struct SearchProviderRegistry {
    providers: Vec<Arc<dyn SearchProvider>>,
}

impl SearchProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Create a registry holding the built-in providers, text editors first.
    pub fn with_default_providers(config: SearchConfig) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(TextEditorProvider::new(config)));
        registry.register(Arc::new(RenderedDocumentProvider::new(config)));
        registry
    }

    /// Register a provider after every provider already registered.
    pub fn register(&mut self, provider: Arc<dyn SearchProvider>) {
        tracing::debug!(
            provider = provider.name(),
            position = self.providers.len(),
            "Registered search provider"
        );
        self.providers.push(provider);
    }

    /// Find the first registered provider that can search `target`.
    pub fn resolve(&self, target: &SearchTarget) -> Option<Arc<dyn SearchProvider>> {
        self.providers
            .iter()
            .find(|provider| provider.can_search_on(target))
            .cloned()
    }

    /// Names of the registered providers, in registration order.
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for SearchProviderRegistry {
    fn default() -> Self {
        Self::with_default_providers(SearchConfig::default())
    }
}

impl fmt::Debug for SearchProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchProviderRegistry")
            .field("providers", &self.provider_names())
            .finish()
    }
}
