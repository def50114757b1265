//! Search executor: the single-session state machine.
//!
//! The executor binds a provider to a target through the registry, forwards
//! the lifecycle calls to it, and republishes its change notifications so
//! observers never need to know which provider is active.
//!
//! Lifecycle calls are serialized: each one holds the session lock until the
//! provider call it delegates to has completed, so concurrent callers queue
//! behind each other in arrival order.

use crate::error::{SearchError, SearchResult};
use crate::host::ActiveContent;
use crate::models::{SearchMatch, SearchOptions};
use crate::observability::{MetricsTracker, Timer};
use crate::providers::SearchProvider;
use crate::registry::SearchProviderRegistry;
use crate::signal::{ChangedSignal, SubscriptionId};
use crate::target::SearchTarget;
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Mutex as AsyncMutex;

/// The provider and target bound for the lifetime of one search.
struct ActiveSession {
    target: SearchTarget,
    provider: Arc<dyn SearchProvider>,
    subscription: SubscriptionId,
}

enum SessionState {
    Idle,
    Searching(ActiveSession),
}

/// Last known provider state, readable without waiting on the session lock.
#[derive(Debug, Clone, Default)]
struct SearchSnapshot {
    /// Id of the session this snapshot describes; 0 while idle.
    session: u64,
    provider: Option<String>,
    matches: Vec<SearchMatch>,
    current_match_index: Option<usize>,
}

/// Apply `update` and report whether the observable match state changed.
fn update_snapshot(
    snapshot: &Mutex<SearchSnapshot>,
    update: impl FnOnce(&mut SearchSnapshot),
) -> bool {
    let Ok(mut snap) = snapshot.lock() else {
        return false;
    };

    let before_matches = snap.matches.clone();
    let before_index = snap.current_match_index;

    update(&mut snap);
    snap.matches != before_matches || snap.current_match_index != before_index
}

/// Copy the provider's state into the snapshot if it still describes
/// `session`.
///
/// Returns `false` for a session that has since ended, so late
/// notifications from an old provider cannot overwrite a newer search.
fn refresh_session(
    snapshot: &Mutex<SearchSnapshot>,
    session: u64,
    provider: &dyn SearchProvider,
) -> bool {
    let matches = provider.matches();
    let index = provider.current_match_index();

    let Ok(mut snap) = snapshot.lock() else {
        return false;
    };
    if snap.session != session {
        return false;
    }

    snap.matches = matches;
    snap.current_match_index = index;
    true
}

/// What the search UI shows: "N of M".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchStatus {
    pub searching: bool,
    pub provider: Option<String>,
    pub total_matches: usize,
    pub current_index: Option<usize>,
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.current_index {
            Some(index) if self.total_matches > 0 => {
                write!(f, "{} of {}", index + 1, self.total_matches)
            }
            _ => write!(f, "0 of {}", self.total_matches),
        }
    }
}

/// Drives one search session at a time against the registered providers.
pub struct SearchExecutor {
    registry: Arc<SearchProviderRegistry>,
    host: Arc<dyn ActiveContent>,
    session: AsyncMutex<SessionState>,
    snapshot: Arc<Mutex<SearchSnapshot>>,
    next_session: AtomicU64,
    changed: Arc<ChangedSignal>,
    metrics: Option<MetricsTracker>,
}

impl SearchExecutor {
    /// Create an idle executor.
    ///
    /// `host` supplies the default target when a search is started without
    /// an explicit one.
    pub fn new(registry: Arc<SearchProviderRegistry>, host: Arc<dyn ActiveContent>) -> Self {
        Self {
            registry,
            host,
            session: AsyncMutex::new(SessionState::Idle),
            snapshot: Arc::new(Mutex::new(SearchSnapshot::default())),
            next_session: AtomicU64::new(1),
            changed: Arc::new(ChangedSignal::new()),
            metrics: None,
        }
    }

    /// Record lifecycle activity into `metrics`.
    pub fn with_metrics(mut self, metrics: MetricsTracker) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Start a new search, ending any search already in progress first.
    ///
    /// Returns every match found. Zero matches is a successful search.
    pub async fn start_search(&self, options: SearchOptions) -> SearchResult<Vec<SearchMatch>> {
        let mut session = self.session.lock().await;

        // A failed teardown has already been logged and the old session is
        // gone either way.
        let _ = self.teardown(&mut session).await;

        let target = match options.target {
            Some(target) => target,
            None => self
                .host
                .active_target()
                .ok_or(SearchError::NoActiveTarget)?,
        };

        let Some(provider) = self.registry.resolve(&target) else {
            if let Some(metrics) = &self.metrics {
                metrics.track_no_provider(target.type_name());
            }
            return Err(SearchError::NoProviderFound {
                target: target.type_name().to_string(),
            });
        };

        tracing::debug!(
            provider = provider.name(),
            target = target.type_name(),
            pattern = options.query.as_str(),
            "Starting search"
        );

        // Mark the session open before delegating so observers of the
        // provider's start notification already see it as searching.
        let session_id = self.next_session.fetch_add(1, Ordering::Relaxed);
        let name = provider.name().to_string();
        update_snapshot(&self.snapshot, |snap| {
            *snap = SearchSnapshot {
                session: session_id,
                provider: Some(name.clone()),
                ..SearchSnapshot::default()
            };
        });

        // Subscribe before delegating so the provider's own start
        // notification is republished.
        let subscription = self.forward_changes(&provider, session_id);
        let timer = Timer::new(format!("start_search:{}", provider.name()));

        match provider.start_search(&options.query, target.clone()).await {
            Ok(matches) => {
                let duration_ms = timer.finish();
                let current = provider.current_match_index();

                let changed = update_snapshot(&self.snapshot, |snap| {
                    snap.matches = matches.clone();
                    snap.current_match_index = current;
                });
                if changed {
                    self.changed.emit();
                }

                if let Some(metrics) = &self.metrics {
                    metrics.track_session_started(&name, matches.len(), duration_ms);
                }

                *session = SessionState::Searching(ActiveSession {
                    target,
                    provider,
                    subscription,
                });
                Ok(matches)
            }
            Err(err) => {
                timer.finish_with_status(false);
                tracing::warn!(provider = provider.name(), error = %err, "Search failed to start");

                provider.changed().disconnect(subscription);
                if let Err(cleanup) = provider.end_search().await {
                    tracing::warn!(
                        provider = provider.name(),
                        error = %cleanup,
                        "Cleanup after failed start also failed"
                    );
                }

                if update_snapshot(&self.snapshot, |snap| *snap = SearchSnapshot::default()) {
                    self.changed.emit();
                }
                if let Some(metrics) = &self.metrics {
                    metrics.track_provider_failure(provider.name(), "start_search");
                }
                Err(err)
            }
        }
    }

    /// End the search in progress, removing its highlights.
    ///
    /// Does nothing when no search is in progress.
    pub async fn end_search(&self) -> SearchResult<()> {
        let mut session = self.session.lock().await;
        self.teardown(&mut session).await
    }

    /// Move to the next match, wrapping after the last.
    ///
    /// Fails with [`SearchError::InvalidState`] when no search is in progress.
    /// Resolves to `None` when the search found nothing.
    pub async fn highlight_next(&self) -> SearchResult<Option<SearchMatch>> {
        self.navigate(true).await
    }

    /// Move to the previous match, wrapping before the first.
    ///
    /// Fails with [`SearchError::InvalidState`] when no search is in progress.
    /// Resolves to `None` when the search found nothing.
    pub async fn highlight_previous(&self) -> SearchResult<Option<SearchMatch>> {
        self.navigate(false).await
    }

    /// Matches of the current search; empty when idle.
    pub fn matches(&self) -> Vec<SearchMatch> {
        self.snapshot
            .lock()
            .map(|s| s.matches.clone())
            .unwrap_or_default()
    }

    /// Index of the current match; `None` when idle or nothing matched.
    pub fn current_match_index(&self) -> Option<usize> {
        self.snapshot
            .lock()
            .ok()
            .and_then(|s| s.current_match_index)
    }

    /// Whether a search session is open.
    pub fn is_searching(&self) -> bool {
        self.active_provider().is_some()
    }

    /// Name of the provider bound to the open session.
    pub fn active_provider(&self) -> Option<String> {
        self.snapshot.lock().ok().and_then(|s| s.provider.clone())
    }

    /// Everything the search UI needs after an operation settles.
    pub fn status(&self) -> SearchStatus {
        let snap = self
            .snapshot
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default();

        SearchStatus {
            searching: snap.provider.is_some(),
            provider: snap.provider,
            total_matches: snap.matches.len(),
            current_index: snap.current_match_index,
        }
    }

    /// Fired whenever the matches or the current index change, whichever
    /// provider is active.
    pub fn changed(&self) -> &ChangedSignal {
        &self.changed
    }

    /// The registry providers are resolved from.
    pub fn registry(&self) -> &SearchProviderRegistry {
        &self.registry
    }

    async fn navigate(&self, forward: bool) -> SearchResult<Option<SearchMatch>> {
        let session = self.session.lock().await;
        let SessionState::Searching(active) = &*session else {
            return Err(SearchError::InvalidState(
                "no search in progress".to_string(),
            ));
        };
        let provider = Arc::clone(&active.provider);

        let result = if forward {
            provider.highlight_next().await
        } else {
            provider.highlight_previous().await
        };

        match result {
            Ok(current) => {
                let matches = provider.matches();
                let index = provider.current_match_index();
                if update_snapshot(&self.snapshot, |snap| {
                    snap.matches = matches;
                    snap.current_match_index = index;
                }) {
                    self.changed.emit();
                }

                if let Some(metrics) = &self.metrics {
                    metrics.track_navigation(provider.name(), forward);
                }
                Ok(current)
            }
            Err(err) => {
                // The session stays open on its last good snapshot.
                tracing::warn!(provider = provider.name(), error = %err, "Navigation failed");
                if let Some(metrics) = &self.metrics {
                    let operation = if forward {
                        "highlight_next"
                    } else {
                        "highlight_previous"
                    };
                    metrics.track_provider_failure(provider.name(), operation);
                }
                Err(err)
            }
        }
    }

    async fn teardown(&self, session: &mut SessionState) -> SearchResult<()> {
        let SessionState::Searching(active) = std::mem::replace(session, SessionState::Idle) else {
            return Ok(());
        };

        active.provider.changed().disconnect(active.subscription);
        let result = active.provider.end_search().await;

        if update_snapshot(&self.snapshot, |snap| *snap = SearchSnapshot::default()) {
            self.changed.emit();
        }

        match &result {
            Ok(()) => {
                tracing::debug!(
                    provider = active.provider.name(),
                    target = active.target.type_name(),
                    "Search ended"
                );
                if let Some(metrics) = &self.metrics {
                    metrics.track_session_ended(active.provider.name());
                }
            }
            Err(err) => {
                tracing::warn!(
                    provider = active.provider.name(),
                    error = %err,
                    "Provider failed to end search"
                );
                if let Some(metrics) = &self.metrics {
                    metrics.track_provider_failure(active.provider.name(), "end_search");
                }
            }
        }

        result
    }

    /// Republish the provider's notifications, refreshing the snapshot first
    /// so subscribers read the provider's new state.
    fn forward_changes(
        &self,
        provider: &Arc<dyn SearchProvider>,
        session: u64,
    ) -> SubscriptionId {
        let weak = Arc::downgrade(provider);
        let snapshot = Arc::clone(&self.snapshot);
        let changed = Arc::clone(&self.changed);

        provider.changed().connect(move || {
            let Some(provider) = weak.upgrade() else {
                return;
            };
            if refresh_session(&snapshot, session, provider.as_ref()) {
                changed.emit();
            }
        })
    }
}

impl fmt::Debug for SearchExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchExecutor")
            .field("registry", &self.registry)
            .field("status", &self.status())
            .finish()
    }
}
