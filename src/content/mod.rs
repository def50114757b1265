//! Host content types the built-in providers know how to search.
//!
//! These model the parts of an editor or rendered view that search touches:
//! the text being searched, the highlight decorations, and the selection.
//! Drawing the decorations is the host's business.

pub mod rendered_document;
pub mod text_editor;

pub use rendered_document::RenderedDocument;
pub use text_editor::TextEditor;

use crate::signal::ChangedSignal;
use serde::Serialize;
use std::any::Any;
use std::ops::Range;

/// How a highlighted range should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecorationKind {
    /// Any match of the active query
    Match,
    /// The match currently selected for navigation
    CurrentMatch,
}

/// A highlighted byte range of a document's searchable text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    pub range: Range<usize>,
    pub kind: DecorationKind,
}

impl Decoration {
    /// Build decorations for every range, marking `current` as the current match.
    pub fn for_matches(ranges: &[Range<usize>], current: Option<usize>) -> Vec<Decoration> {
        ranges
            .iter()
            .enumerate()
            .map(|(i, range)| Decoration {
                range: range.clone(),
                kind: if Some(i) == current {
                    DecorationKind::CurrentMatch
                } else {
                    DecorationKind::Match
                },
            })
            .collect()
    }
}

/// Content a [`ContentSearchProvider`](crate::providers::ContentSearchProvider)
/// can search and highlight.
pub trait SearchableContent: Any + Send + Sync {
    /// Name of the provider that searches this content type.
    const PROVIDER_NAME: &'static str;

    /// Human-readable title of this piece of content.
    fn title(&self) -> String;

    /// The text matches are located in. Byte ranges passed to
    /// [`apply_highlights`](Self::apply_highlights) index into this text.
    fn searchable_text(&self) -> String;

    /// Decorate every range and select the current one.
    fn apply_highlights(&self, ranges: &[Range<usize>], current: Option<usize>);

    /// Remove every search decoration.
    fn clear_highlights(&self);

    /// Fired after the searchable text is modified.
    fn content_changed(&self) -> &ChangedSignal;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decorations_mark_current() {
        let decorations = Decoration::for_matches(&[0..3, 8..11, 16..19], Some(1));

        assert_eq!(decorations.len(), 3);
        assert_eq!(decorations[0].kind, DecorationKind::Match);
        assert_eq!(decorations[1].kind, DecorationKind::CurrentMatch);
        assert_eq!(decorations[1].range, 8..11);
        assert_eq!(decorations[2].kind, DecorationKind::Match);
    }

    #[test]
    fn test_decorations_without_current() {
        let decorations = Decoration::for_matches(&[0..3], None);
        assert_eq!(decorations[0].kind, DecorationKind::Match);
        assert!(Decoration::for_matches(&[], None).is_empty());
    }
}
