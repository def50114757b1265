//! Opaque handles to searchable host content.
//!
//! The core never inspects a target itself. Providers decide whether they can
//! search one by downcasting to the concrete content type they understand.

use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

/// A type-erased, shareable reference to a piece of host content.
#[derive(Clone)]
pub struct SearchTarget {
    content: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl SearchTarget {
    /// Wrap shared host content as a search target.
    pub fn new<T: Any + Send + Sync>(content: Arc<T>) -> Self {
        Self {
            content,
            type_name: type_name::<T>(),
        }
    }

    /// Whether the underlying content is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        (*self.content).is::<T>()
    }

    /// Borrow the underlying content as a `T`, if it is one.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.content).downcast_ref::<T>()
    }

    /// Get a shared handle to the underlying content as a `T`, if it is one.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.content).downcast::<T>().ok()
    }

    /// Fully qualified name of the wrapped content type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether both handles point at the same content.
    pub fn same_content(&self, other: &SearchTarget) -> bool {
        Arc::as_ptr(&self.content) as *const () == Arc::as_ptr(&other.content) as *const ()
    }
}

impl fmt::Debug for SearchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchTarget")
            .field("type_name", &self.type_name)
            .finish()
    }
}
