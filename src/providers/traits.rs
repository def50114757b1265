use crate::error::SearchResult;
use crate::models::SearchMatch;
use crate::signal::ChangedSignal;
use crate::target::SearchTarget;
use async_trait::async_trait;
use regex::Regex;

/// Search capability for one class of content.
///
/// A provider owns at most one open search at a time; the executor
/// guarantees `start_search` is never called twice without an intervening
/// `end_search`.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Stable identifier used in logs and status output.
    fn name(&self) -> &str;

    /// Report whether this provider can search the given target.
    ///
    /// Must be free of side effects and must return `false`, never panic,
    /// for content types the provider does not understand.
    fn can_search_on(&self, target: &SearchTarget) -> bool;

    /// Locate every match of `query` in `target`, highlight them all, and make
    /// the first one (if any) current.
    ///
    /// Returns the matches in source order with indices assigned from 0.
    async fn start_search(
        &self,
        query: &Regex,
        target: SearchTarget,
    ) -> SearchResult<Vec<SearchMatch>>;

    /// Remove all highlights and forget the matches.
    ///
    /// Resolves successfully when nothing is open.
    async fn end_search(&self) -> SearchResult<()>;

    /// Move the current match forward, wrapping from the last to the first.
    ///
    /// Resolves to `None` when there are no matches.
    async fn highlight_next(&self) -> SearchResult<Option<SearchMatch>>;

    /// Move the current match backward, wrapping from the first to the last.
    ///
    /// Resolves to `None` when there are no matches.
    async fn highlight_previous(&self) -> SearchResult<Option<SearchMatch>>;

    /// Matches from the latest completed operation.
    fn matches(&self) -> Vec<SearchMatch>;

    /// Position of the current match within [`matches`](Self::matches).
    fn current_match_index(&self) -> Option<usize>;

    /// Fired whenever the matches or the current index change.
    fn changed(&self) -> &ChangedSignal;
}
