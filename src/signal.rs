//! Change notification stream.
//!
//! Providers emit on their own signal whenever their match list or current
//! index changes, and the executor re-publishes those emissions on its own
//! signal. Callbacks run synchronously on the emitting task, so every
//! subscriber has observed a change before the operation that caused it
//! returns to its caller.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Callback invoked on every emission.
pub type ChangedCallback = Arc<dyn Fn() + Send + Sync>;

/// Handle returned by [`ChangedSignal::connect`], used to disconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A payload-free "something changed" signal with any number of subscribers.
#[derive(Default)]
pub struct ChangedSignal {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(SubscriptionId, ChangedCallback)>>,
}

impl ChangedSignal {
    /// Create a signal with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a callback. Subscribers are notified in connection order.
    pub fn connect<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));

        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push((id, Arc::new(callback)));
        }

        id
    }

    /// Unsubscribe a callback.
    ///
    /// Returns `false` if the id was not (or is no longer) connected.
    pub fn disconnect(&self, id: SubscriptionId) -> bool {
        if let Ok(mut listeners) = self.listeners.lock() {
            let before = listeners.len();
            listeners.retain(|(existing, _)| *existing != id);
            return listeners.len() != before;
        }

        false
    }

    /// Notify every subscriber.
    ///
    /// The subscriber list is snapshotted first, so callbacks may connect or
    /// disconnect (including themselves) without deadlocking.
    pub fn emit(&self) {
        let callbacks: Vec<ChangedCallback> = match self.listeners.lock() {
            Ok(listeners) => listeners.iter().map(|(_, cb)| Arc::clone(cb)).collect(),
            Err(_) => return,
        };

        for callback in callbacks {
            callback();
        }
    }

    /// Number of connected subscribers.
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().map(|l| l.len()).unwrap_or(0)
    }
}

impl fmt::Debug for ChangedSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangedSignal")
            .field("listeners", &self.listener_count())
            .finish()
    }
}
