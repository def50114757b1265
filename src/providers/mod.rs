//! Search providers.
//!
//! A provider implements search for one class of content behind the
//! [`SearchProvider`] trait. The registry picks one per target and the
//! executor drives it through start, navigation, and end.

pub mod content_provider;
pub mod cursor;
pub mod matcher;
mod traits;

pub use content_provider::{ContentSearchProvider, RenderedDocumentProvider, TextEditorProvider};
pub use cursor::MatchCursor;
pub use matcher::{find_matches, LocatedMatch};
pub use traits::SearchProvider;
