//! Request describing a search to start.

use crate::target::SearchTarget;
use regex::Regex;

/// Parameters for starting a search session.
///
/// The query is an already-compiled pattern. When `target` is `None` the
/// executor searches whatever content the host reports as active.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Compiled query pattern
    pub query: Regex,

    /// Explicit content to search, if any
    pub target: Option<SearchTarget>,
}

impl SearchOptions {
    /// Search the host's active content for `query`.
    pub fn new(query: Regex) -> Self {
        Self {
            query,
            target: None,
        }
    }

    /// Search an explicit target instead of the active content.
    pub fn with_target(mut self, target: SearchTarget) -> Self {
        self.target = Some(target);
        self
    }
}
