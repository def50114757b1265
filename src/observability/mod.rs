//! Observability module for monitoring and metrics.
//!
//! This module provides session and navigation counters plus operation
//! timing, reported through structured `tracing` events.

pub mod metrics;

pub use metrics::{MetricsTracker, Timer};
