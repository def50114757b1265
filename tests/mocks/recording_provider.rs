use async_trait::async_trait;
use document_search::error::{SearchError, SearchResult};
use document_search::models::SearchMatch;
use document_search::providers::SearchProvider;
use document_search::signal::ChangedSignal;
use document_search::target::SearchTarget;
use regex::Regex;
use std::any::Any;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Stand-in content types for resolution tests.
#[allow(dead_code)]
pub struct TargetKindA;

#[allow(dead_code)]
pub struct TargetKindB;

/// Shared, ordered record of provider calls as `"<provider>:<operation>"`.
pub type CallLog = Arc<Mutex<Vec<String>>>;

#[derive(Default)]
struct StubState {
    matches: Vec<SearchMatch>,
    current: Option<usize>,
}

/// Mock provider returning canned matches and recording every call.
#[allow(dead_code)]
pub struct RecordingProvider {
    name: String,
    accepts: Box<dyn Fn(&SearchTarget) -> bool + Send + Sync>,
    canned: Vec<SearchMatch>,
    log: CallLog,
    fail_on: Option<String>,
    delay: Option<Duration>,
    state: Mutex<StubState>,
    changed: ChangedSignal,
}

#[allow(dead_code)]
impl RecordingProvider {
    /// A provider that claims every target.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            accepts: Box::new(|_: &SearchTarget| true),
            canned: Vec::new(),
            log: Arc::new(Mutex::new(Vec::new())),
            fail_on: None,
            delay: None,
            state: Mutex::new(StubState::default()),
            changed: ChangedSignal::new(),
        }
    }

    /// A provider that only claims targets wrapping a `T`.
    pub fn accepting<T: Any>(name: &str) -> Self {
        let mut provider = Self::new(name);
        provider.accepts = Box::new(|target: &SearchTarget| target.is::<T>());
        provider
    }

    /// Canned matches returned by every `start_search`, one per text.
    pub fn with_matches(mut self, texts: &[&str]) -> Self {
        self.canned = texts
            .iter()
            .enumerate()
            .map(|(i, text)| SearchMatch::new(*text, format!("...{}...", text), i, 0, i))
            .collect();
        self
    }

    /// Record calls into a log shared with other providers.
    pub fn with_log(mut self, log: CallLog) -> Self {
        self.log = log;
        self
    }

    /// Fail the named operation with a provider failure.
    pub fn failing_on(mut self, operation: &str) -> Self {
        self.fail_on = Some(operation.to_string());
        self
    }

    /// Sleep inside every async operation.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn call_count(&self, operation: &str) -> usize {
        let entry = format!("{}:{}", self.name, operation);
        self.log.lock().unwrap().iter().filter(|c| **c == entry).count()
    }

    async fn record(&self, operation: &str) -> SearchResult<()> {
        self.log
            .lock()
            .unwrap()
            .push(format!("{}:{}", self.name, operation));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_on.as_deref() == Some(operation) {
            return Err(SearchError::provider(
                &self.name,
                format!("{} failed", operation),
            ));
        }
        Ok(())
    }

    fn step(&self, forward: bool) -> Option<SearchMatch> {
        let (current, moved) = {
            let mut state = self.state.lock().unwrap();
            let len = state.matches.len();
            let index = state.current?;
            let next = if forward {
                (index + 1) % len
            } else {
                (index + len - 1) % len
            };
            state.current = Some(next);
            (state.matches[next].clone(), next != index)
        };

        if moved {
            self.changed.emit();
        }
        Some(current)
    }
}

#[async_trait]
impl SearchProvider for RecordingProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn can_search_on(&self, target: &SearchTarget) -> bool {
        (self.accepts)(target)
    }

    async fn start_search(
        &self,
        _query: &Regex,
        _target: SearchTarget,
    ) -> SearchResult<Vec<SearchMatch>> {
        self.record("start_search").await?;

        {
            let mut state = self.state.lock().unwrap();
            state.matches = self.canned.clone();
            state.current = if self.canned.is_empty() { None } else { Some(0) };
        }

        if !self.canned.is_empty() {
            self.changed.emit();
        }
        Ok(self.canned.clone())
    }

    async fn end_search(&self) -> SearchResult<()> {
        self.record("end_search").await?;

        let had_matches = {
            let mut state = self.state.lock().unwrap();
            let had = !state.matches.is_empty();
            *state = StubState::default();
            had
        };

        if had_matches {
            self.changed.emit();
        }
        Ok(())
    }

    async fn highlight_next(&self) -> SearchResult<Option<SearchMatch>> {
        self.record("highlight_next").await?;
        Ok(self.step(true))
    }

    async fn highlight_previous(&self) -> SearchResult<Option<SearchMatch>> {
        self.record("highlight_previous").await?;
        Ok(self.step(false))
    }

    fn matches(&self) -> Vec<SearchMatch> {
        self.state.lock().unwrap().matches.clone()
    }

    fn current_match_index(&self) -> Option<usize> {
        self.state.lock().unwrap().current
    }

    fn changed(&self) -> &ChangedSignal {
        &self.changed
    }
}
