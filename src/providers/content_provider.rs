//! Search provider for any [`SearchableContent`] type.
//!
//! The built-in text editor and rendered document providers are both
//! instances of [`ContentSearchProvider`]. While a search is open the
//! provider also listens for edits to the bound content and re-runs the
//! query, keeping the current match as stable as the new text allows.

use super::cursor::MatchCursor;
use super::matcher::find_matches;
use super::traits::SearchProvider;
use crate::config::SearchConfig;
use crate::content::{RenderedDocument, SearchableContent, TextEditor};
use crate::error::{SearchError, SearchResult};
use crate::models::SearchMatch;
use crate::signal::{ChangedSignal, SubscriptionId};
use crate::target::SearchTarget;
use async_trait::async_trait;
use regex::Regex;
use std::sync::{Arc, Mutex, MutexGuard};

/// Provider for plain text editors.
pub type TextEditorProvider = ContentSearchProvider<TextEditor>;

/// Provider for rendered markup documents.
pub type RenderedDocumentProvider = ContentSearchProvider<RenderedDocument>;

/// The content and query of the open search.
struct BoundSearch<C> {
    content: Arc<C>,
    query: Regex,
    subscription: SubscriptionId,
}

impl<C: SearchableContent> BoundSearch<C> {
    fn release(self) {
        self.content.content_changed().disconnect(self.subscription);
        self.content.clear_highlights();
    }
}

struct ProviderState<C> {
    bound: Option<BoundSearch<C>>,
    cursor: MatchCursor,
}

struct Inner<C> {
    config: SearchConfig,
    state: Mutex<ProviderState<C>>,
    changed: ChangedSignal,
}

/// Searches, highlights, and navigates one content type.
pub struct ContentSearchProvider<C: SearchableContent> {
    inner: Arc<Inner<C>>,
}

impl<C: SearchableContent> ContentSearchProvider<C> {
    /// Create a provider producing fragments sized by `config`.
    pub fn new(config: SearchConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                state: Mutex::new(ProviderState {
                    bound: None,
                    cursor: MatchCursor::default(),
                }),
                changed: ChangedSignal::new(),
            }),
        }
    }

    /// Whether a search is currently open on this provider.
    pub fn is_open(&self) -> bool {
        self.inner
            .state
            .lock()
            .map(|s| s.bound.is_some())
            .unwrap_or(false)
    }
}

impl<C: SearchableContent> Default for ContentSearchProvider<C> {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl<C: SearchableContent> Inner<C> {
    fn lock(&self) -> SearchResult<MutexGuard<'_, ProviderState<C>>> {
        self.state
            .lock()
            .map_err(|_| SearchError::provider(C::PROVIDER_NAME, "provider state lock poisoned"))
    }

    fn begin(self: &Arc<Self>, query: &Regex, content: Arc<C>) -> SearchResult<Vec<SearchMatch>> {
        let (matches, changed) = {
            let mut state = self.lock()?;
            if let Some(previous) = state.bound.take() {
                previous.release();
            }

            let located = find_matches(&content.searchable_text(), query, &self.config);
            let cursor = MatchCursor::new(located);
            content.apply_highlights(cursor.ranges(), cursor.current_index());

            let weak = Arc::downgrade(self);
            let subscription = content.content_changed().connect(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.rescan();
                }
            });

            let matches = cursor.matches().to_vec();
            let changed = state.cursor != cursor;
            state.bound = Some(BoundSearch {
                content,
                query: query.clone(),
                subscription,
            });
            state.cursor = cursor;
            (matches, changed)
        };

        // Lock released before notifying so subscribers can read our state.
        if changed {
            self.changed.emit();
        }

        Ok(matches)
    }

    fn finish(&self) -> SearchResult<()> {
        let changed = {
            let mut state = self.lock()?;
            if let Some(bound) = state.bound.take() {
                bound.release();
            }
            let changed = !state.cursor.is_empty();
            state.cursor = MatchCursor::default();
            changed
        };

        if changed {
            self.changed.emit();
        }
        Ok(())
    }

    fn step(&self, forward: bool) -> SearchResult<Option<SearchMatch>> {
        let (next, changed) = {
            let mut state = self.lock()?;
            let before = state.cursor.current_index();
            let next = if forward {
                state.cursor.advance().cloned()
            } else {
                state.cursor.retreat().cloned()
            };

            if next.is_some() {
                if let Some(bound) = &state.bound {
                    bound
                        .content
                        .apply_highlights(state.cursor.ranges(), state.cursor.current_index());
                }
            }

            (next, before != state.cursor.current_index())
        };

        if changed {
            self.changed.emit();
        }
        Ok(next)
    }

    fn rescan(&self) {
        let changed = {
            let Ok(mut state) = self.state.lock() else {
                return;
            };
            let Some(bound) = &state.bound else {
                return;
            };

            let located = find_matches(&bound.content.searchable_text(), &bound.query, &self.config);
            let cursor = MatchCursor::with_current(located, state.cursor.current_index());
            bound
                .content
                .apply_highlights(cursor.ranges(), cursor.current_index());

            let changed = cursor != state.cursor;
            state.cursor = cursor;
            changed
        };

        if changed {
            tracing::debug!(provider = C::PROVIDER_NAME, "Content edited, matches refreshed");
            self.changed.emit();
        }
    }
}

#[async_trait]
impl<C: SearchableContent> SearchProvider for ContentSearchProvider<C> {
    fn name(&self) -> &str {
        C::PROVIDER_NAME
    }

    fn can_search_on(&self, target: &SearchTarget) -> bool {
        target.is::<C>()
    }

    async fn start_search(
        &self,
        query: &Regex,
        target: SearchTarget,
    ) -> SearchResult<Vec<SearchMatch>> {
        let content = target.downcast::<C>().ok_or_else(|| {
            SearchError::provider(
                C::PROVIDER_NAME,
                format!("cannot search content of type {}", target.type_name()),
            )
        })?;

        let title = content.title();
        let matches = self.inner.begin(query, content)?;

        tracing::debug!(
            provider = C::PROVIDER_NAME,
            title = %title,
            match_count = matches.len(),
            "Search started"
        );
        Ok(matches)
    }

    async fn end_search(&self) -> SearchResult<()> {
        self.inner.finish()
    }

    async fn highlight_next(&self) -> SearchResult<Option<SearchMatch>> {
        self.inner.step(true)
    }

    async fn highlight_previous(&self) -> SearchResult<Option<SearchMatch>> {
        self.inner.step(false)
    }

    fn matches(&self) -> Vec<SearchMatch> {
        self.inner
            .state
            .lock()
            .map(|s| s.cursor.matches().to_vec())
            .unwrap_or_default()
    }

    fn current_match_index(&self) -> Option<usize> {
        self.inner
            .state
            .lock()
            .ok()
            .and_then(|s| s.cursor.current_index())
    }

    fn changed(&self) -> &ChangedSignal {
        &self.inner.changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::DecorationKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn editor_target(text: &str) -> (Arc<TextEditor>, SearchTarget) {
        let editor = Arc::new(TextEditor::new("buffer", text));
        let target = SearchTarget::new(editor.clone());
        (editor, target)
    }

    fn count_changes(provider: &impl SearchProvider) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        provider.changed().connect(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        count
    }

    #[tokio::test]
    async fn test_start_search_highlights_first_match() {
        let provider = TextEditorProvider::default();
        let (editor, target) = editor_target("foo bar foo baz foo");
        let re = Regex::new("foo").unwrap();

        let matches = provider.start_search(&re, target).await.unwrap();

        assert_eq!(matches.len(), 3);
        assert_eq!(provider.current_match_index(), Some(0));
        assert_eq!(editor.selection(), Some(0..3));
        assert_eq!(editor.decorations().len(), 3);
        assert_eq!(editor.decorations()[0].kind, DecorationKind::CurrentMatch);
        assert!(provider.is_open());
    }

    #[tokio::test]
    async fn test_navigation_wraps_and_moves_selection() {
        let provider = TextEditorProvider::default();
        let (editor, target) = editor_target("foo bar foo baz foo");
        let re = Regex::new("foo").unwrap();
        provider.start_search(&re, target).await.unwrap();

        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(provider.highlight_next().await.unwrap().unwrap().index);
        }
        assert_eq!(seen, vec![1, 2, 0]);

        let prev = provider.highlight_previous().await.unwrap().unwrap();
        assert_eq!(prev.index, 2);
        assert_eq!(editor.selection(), Some(16..19));
    }

    #[tokio::test]
    async fn test_end_search_clears_highlights() {
        let provider = TextEditorProvider::default();
        let (editor, target) = editor_target("foo foo");
        let re = Regex::new("foo").unwrap();
        provider.start_search(&re, target).await.unwrap();

        provider.end_search().await.unwrap();

        assert!(editor.decorations().is_empty());
        assert!(provider.matches().is_empty());
        assert_eq!(provider.current_match_index(), None);
        assert!(!provider.is_open());

        // Nothing open: still resolves.
        provider.end_search().await.unwrap();
    }

    #[tokio::test]
    async fn test_no_matches_navigation_is_inert() {
        let provider = TextEditorProvider::default();
        let (_editor, target) = editor_target("nothing to see");
        let re = Regex::new("foo").unwrap();
        let changes = count_changes(&provider);

        let matches = provider.start_search(&re, target).await.unwrap();
        assert!(matches.is_empty());

        assert_eq!(provider.highlight_next().await.unwrap(), None);
        assert_eq!(provider.highlight_previous().await.unwrap(), None);
        assert_eq!(provider.current_match_index(), None);

        provider.end_search().await.unwrap();
        assert_eq!(changes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_changed_fires_only_on_delta() {
        let provider = TextEditorProvider::default();
        let (_editor, target) = editor_target("foo and foo");
        let re = Regex::new("foo").unwrap();
        let changes = count_changes(&provider);

        provider.start_search(&re, target).await.unwrap();
        assert_eq!(changes.load(Ordering::SeqCst), 1);

        provider.highlight_next().await.unwrap();
        assert_eq!(changes.load(Ordering::SeqCst), 2);

        provider.end_search().await.unwrap();
        assert_eq!(changes.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_single_match_navigation_does_not_fire() {
        let provider = TextEditorProvider::default();
        let (_editor, target) = editor_target("just one foo");
        let re = Regex::new("foo").unwrap();
        provider.start_search(&re, target).await.unwrap();
        let changes = count_changes(&provider);

        let m = provider.highlight_next().await.unwrap().unwrap();
        assert_eq!(m.index, 0);
        assert_eq!(changes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_edit_rescans_open_search() {
        let provider = TextEditorProvider::default();
        let (editor, target) = editor_target("foo foo foo");
        let re = Regex::new("foo").unwrap();
        provider.start_search(&re, target).await.unwrap();
        provider.highlight_next().await.unwrap();
        provider.highlight_next().await.unwrap();
        let changes = count_changes(&provider);

        editor.set_text("foo bar foo");

        assert_eq!(changes.load(Ordering::SeqCst), 1);
        assert_eq!(provider.matches().len(), 2);
        // Index 2 no longer exists, so the cursor clamps to the last match.
        assert_eq!(provider.current_match_index(), Some(1));
        assert_eq!(editor.selection(), Some(8..11));
    }

    #[tokio::test]
    async fn test_edit_after_end_is_ignored() {
        let provider = TextEditorProvider::default();
        let (editor, target) = editor_target("foo");
        let re = Regex::new("foo").unwrap();
        provider.start_search(&re, target).await.unwrap();
        provider.end_search().await.unwrap();
        let changes = count_changes(&provider);

        editor.set_text("foo foo");

        assert_eq!(changes.load(Ordering::SeqCst), 0);
        assert!(provider.matches().is_empty());
        assert_eq!(editor.content_changed().listener_count(), 0);
    }

    #[tokio::test]
    async fn test_can_search_on_foreign_target() {
        let provider = TextEditorProvider::default();
        let rendered = SearchTarget::new(Arc::new(RenderedDocument::new("p", "<p>x</p>")));
        let foreign = SearchTarget::new(Arc::new(42_u32));
        let (_editor, editor_target) = editor_target("x");

        assert!(provider.can_search_on(&editor_target));
        assert!(!provider.can_search_on(&rendered));
        assert!(!provider.can_search_on(&foreign));
    }

    #[tokio::test]
    async fn test_start_on_foreign_target_fails() {
        let provider = TextEditorProvider::default();
        let foreign = SearchTarget::new(Arc::new(42_u32));
        let re = Regex::new("4").unwrap();

        let err = provider.start_search(&re, foreign).await.unwrap_err();
        assert!(err.is_provider_failure());
        assert!(!provider.is_open());
    }

    #[tokio::test]
    async fn test_rendered_document_searches_visible_text() {
        let provider = RenderedDocumentProvider::default();
        let doc = Arc::new(RenderedDocument::new(
            "page.html",
            "<h1>Title</h1>\n<p>a <b>foo</b> and <i>foo</i></p>\n<a href=\"foo\">link</a>",
        ));
        let re = Regex::new("foo").unwrap();

        let matches = provider
            .start_search(&re, SearchTarget::new(doc.clone()))
            .await
            .unwrap();

        // The attribute value in the third line is not visible text.
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| m.line == 1));
        assert_eq!(matches[0].column, 2);
        assert_eq!(matches[0].fragment, "a foo and foo");
        assert_eq!(doc.scrolled_to(), Some(1));
        assert_eq!(doc.marks().len(), 2);

        provider.end_search().await.unwrap();
        assert!(doc.marks().is_empty());
    }
}
