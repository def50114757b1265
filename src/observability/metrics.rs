//! Search lifecycle metrics.
//!
//! Counters are cheap to clone and share between the executor and whoever
//! wants to report on it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Shared counters for search activity.
#[derive(Debug, Clone)]
pub struct MetricsTracker {
    sessions_started_total: Arc<AtomicU64>,
    sessions_ended_total: Arc<AtomicU64>,
    navigations_total: Arc<AtomicU64>,
    matches_found_total: Arc<AtomicU64>,
    no_provider_total: Arc<AtomicU64>,
    provider_failures_total: Arc<AtomicU64>,
}

impl MetricsTracker {
    /// Create a new metrics tracker.
    pub fn new() -> Self {
        Self {
            sessions_started_total: Arc::new(AtomicU64::new(0)),
            sessions_ended_total: Arc::new(AtomicU64::new(0)),
            navigations_total: Arc::new(AtomicU64::new(0)),
            matches_found_total: Arc::new(AtomicU64::new(0)),
            no_provider_total: Arc::new(AtomicU64::new(0)),
            provider_failures_total: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Track a successfully started session.
    pub fn track_session_started(&self, provider: &str, match_count: usize, duration_ms: u128) {
        self.sessions_started_total.fetch_add(1, Ordering::Relaxed);
        self.matches_found_total
            .fetch_add(match_count as u64, Ordering::Relaxed);

        tracing::info!(
            provider = %provider,
            match_count = match_count,
            duration_ms = duration_ms,
            "Search session started"
        );
    }

    /// Track a session teardown.
    pub fn track_session_ended(&self, provider: &str) {
        self.sessions_ended_total.fetch_add(1, Ordering::Relaxed);
        tracing::info!(provider = %provider, "Search session ended");
    }

    /// Track a next/previous navigation.
    pub fn track_navigation(&self, provider: &str, forward: bool) {
        self.navigations_total.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(provider = %provider, forward = forward, "Navigation");
    }

    /// Track a start request no provider could serve.
    pub fn track_no_provider(&self, target_type: &str) {
        self.no_provider_total.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(target_type = %target_type, "No search provider for target");
    }

    /// Track a failed provider operation.
    pub fn track_provider_failure(&self, provider: &str, operation: &str) {
        self.provider_failures_total.fetch_add(1, Ordering::Relaxed);
        tracing::warn!(provider = %provider, operation = %operation, "Provider operation failed");
    }

    pub fn sessions_started_total(&self) -> u64 {
        self.sessions_started_total.load(Ordering::Relaxed)
    }

    pub fn sessions_ended_total(&self) -> u64 {
        self.sessions_ended_total.load(Ordering::Relaxed)
    }

    pub fn navigations_total(&self) -> u64 {
        self.navigations_total.load(Ordering::Relaxed)
    }

    pub fn matches_found_total(&self) -> u64 {
        self.matches_found_total.load(Ordering::Relaxed)
    }

    pub fn no_provider_total(&self) -> u64 {
        self.no_provider_total.load(Ordering::Relaxed)
    }

    pub fn provider_failures_total(&self) -> u64 {
        self.provider_failures_total.load(Ordering::Relaxed)
    }

    /// Average matches per started session (0.0 when none started).
    pub fn average_matches_per_session(&self) -> f64 {
        let sessions = self.sessions_started_total() as f64;

        if sessions == 0.0 {
            0.0
        } else {
            self.matches_found_total() as f64 / sessions
        }
    }

    /// Print a summary of all metrics.
    pub fn summary(&self) -> String {
        format!(
            "Metrics Summary:\n\
             Sessions Started: {}\n\
             Sessions Ended: {}\n\
             Navigations: {}\n\
             Matches Found: {} ({:.2} per session)\n\
             No Provider: {}\n\
             Provider Failures: {}",
            self.sessions_started_total(),
            self.sessions_ended_total(),
            self.navigations_total(),
            self.matches_found_total(),
            self.average_matches_per_session(),
            self.no_provider_total(),
            self.provider_failures_total(),
        )
    }
}

impl Default for MetricsTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// A timer for tracking operation duration.
pub struct Timer {
    start: Instant,
    operation: String,
}

impl Timer {
    /// Start a new timer for the given operation.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            operation: operation.into(),
        }
    }

    /// Finish the timer and return the elapsed time in milliseconds.
    pub fn finish(self) -> u128 {
        let duration_ms = self.start.elapsed().as_millis();

        tracing::debug!(
            operation = %self.operation,
            duration_ms = duration_ms,
            "Operation completed"
        );

        duration_ms
    }

    /// Finish the timer with a specific status.
    pub fn finish_with_status(self, success: bool) -> u128 {
        let duration_ms = self.start.elapsed().as_millis();

        if success {
            tracing::debug!(
                operation = %self.operation,
                duration_ms = duration_ms,
                "Operation succeeded"
            );
        } else {
            tracing::warn!(
                operation = %self.operation,
                duration_ms = duration_ms,
                "Operation failed"
            );
        }

        duration_ms
    }
}
