//! Plain text editor content.

use super::{Decoration, SearchableContent};
use crate::signal::ChangedSignal;
use std::ops::Range;
use std::sync::RwLock;

#[derive(Debug, Default)]
struct EditorState {
    text: String,
    selection: Option<Range<usize>>,
    decorations: Vec<Decoration>,
}

/// An editable plain text buffer with a selection and search decorations.
#[derive(Debug)]
pub struct TextEditor {
    title: String,
    state: RwLock<EditorState>,
    content_changed: ChangedSignal,
}

impl TextEditor {
    /// Create an editor holding `text`.
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            state: RwLock::new(EditorState {
                text: text.into(),
                ..Default::default()
            }),
            content_changed: ChangedSignal::new(),
        }
    }

    /// Current buffer contents.
    pub fn text(&self) -> String {
        self.state
            .read()
            .map(|s| s.text.clone())
            .unwrap_or_default()
    }

    /// Replace the buffer contents.
    ///
    /// Existing decorations and the selection are dropped since their ranges
    /// no longer refer to the same text.
    pub fn set_text(&self, text: impl Into<String>) {
        if let Ok(mut state) = self.state.write() {
            state.text = text.into();
            state.selection = None;
            state.decorations.clear();
        }

        // Lock released before notifying so listeners can read the buffer.
        self.content_changed.emit();
    }

    /// Currently selected byte range, if any.
    pub fn selection(&self) -> Option<Range<usize>> {
        self.state.read().ok().and_then(|s| s.selection.clone())
    }

    /// Text of the current selection, if any.
    pub fn selected_text(&self) -> Option<String> {
        let state = self.state.read().ok()?;
        let range = state.selection.clone()?;
        state.text.get(range).map(str::to_string)
    }

    /// Active search decorations.
    pub fn decorations(&self) -> Vec<Decoration> {
        self.state
            .read()
            .map(|s| s.decorations.clone())
            .unwrap_or_default()
    }
}

impl SearchableContent for TextEditor {
    const PROVIDER_NAME: &'static str = "text-editor";

    fn title(&self) -> String {
        self.title.clone()
    }

    fn searchable_text(&self) -> String {
        self.text()
    }

    fn apply_highlights(&self, ranges: &[Range<usize>], current: Option<usize>) {
        if let Ok(mut state) = self.state.write() {
            state.decorations = Decoration::for_matches(ranges, current);
            if let Some(range) = current.and_then(|i| ranges.get(i)) {
                state.selection = Some(range.clone());
            }
        }
    }

    fn clear_highlights(&self) {
        if let Ok(mut state) = self.state.write() {
            state.decorations.clear();
        }
    }

    fn content_changed(&self) -> &ChangedSignal {
        &self.content_changed
    }
}
