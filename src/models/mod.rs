//! Data models for document search.
//!
//! This module contains the value types exchanged between the executor,
//! the providers, and the UI collaborator.

pub mod options;
pub mod search_match;

pub use options::SearchOptions;
pub use search_match::SearchMatch;
