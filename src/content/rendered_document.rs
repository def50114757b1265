//! Rendered markup documents.
//!
//! Search runs over what the reader sees: tags are stripped and common
//! entities decoded, line by line, so visible line numbers line up with the
//! source lines.

use super::{Decoration, SearchableContent};
use crate::signal::ChangedSignal;
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;
use std::sync::RwLock;

static HTML_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>\n]*>").expect("Failed to compile HTML tag regex"));

const ENTITIES: [(&str, &str); 6] = [
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&nbsp;", " "),
    // Must come last so "&amp;lt;" decodes to "&lt;" and not "<".
    ("&amp;", "&"),
];

#[derive(Debug, Default)]
struct RenderedState {
    markup: String,
    visible: String,
    marks: Vec<Decoration>,
    scrolled_to: Option<usize>,
}

/// A read-only rendered view of markup source.
#[derive(Debug)]
pub struct RenderedDocument {
    title: String,
    state: RwLock<RenderedState>,
    content_changed: ChangedSignal,
}

impl RenderedDocument {
    /// Render `markup` for display and search.
    pub fn new(title: impl Into<String>, markup: impl Into<String>) -> Self {
        let markup = markup.into();
        let visible = render_visible_text(&markup);
        Self {
            title: title.into(),
            state: RwLock::new(RenderedState {
                markup,
                visible,
                ..Default::default()
            }),
            content_changed: ChangedSignal::new(),
        }
    }

    /// The original markup source.
    pub fn markup(&self) -> String {
        self.state
            .read()
            .map(|s| s.markup.clone())
            .unwrap_or_default()
    }

    /// Re-render with new markup.
    pub fn set_markup(&self, markup: impl Into<String>) {
        if let Ok(mut state) = self.state.write() {
            state.markup = markup.into();
            state.visible = render_visible_text(&state.markup);
            state.marks.clear();
            state.scrolled_to = None;
        }

        self.content_changed.emit();
    }

    /// The visible text searches run against.
    pub fn visible_text(&self) -> String {
        self.state
            .read()
            .map(|s| s.visible.clone())
            .unwrap_or_default()
    }

    /// Active highlight marks over the visible text.
    pub fn marks(&self) -> Vec<Decoration> {
        self.state
            .read()
            .map(|s| s.marks.clone())
            .unwrap_or_default()
    }

    /// Visible line the view was last scrolled to for the current match.
    pub fn scrolled_to(&self) -> Option<usize> {
        self.state.read().ok().and_then(|s| s.scrolled_to)
    }
}

impl SearchableContent for RenderedDocument {
    const PROVIDER_NAME: &'static str = "rendered-document";

    fn title(&self) -> String {
        self.title.clone()
    }

    fn searchable_text(&self) -> String {
        self.visible_text()
    }

    fn apply_highlights(&self, ranges: &[Range<usize>], current: Option<usize>) {
        if let Ok(mut state) = self.state.write() {
            state.marks = Decoration::for_matches(ranges, current);
            if let Some(range) = current.and_then(|i| ranges.get(i)) {
                state.scrolled_to = state
                    .visible
                    .get(..range.start)
                    .map(|before| before.matches('\n').count());
            }
        }
    }

    fn clear_highlights(&self) {
        if let Ok(mut state) = self.state.write() {
            state.marks.clear();
        }
    }

    fn content_changed(&self) -> &ChangedSignal {
        &self.content_changed
    }
}

/// Strip tags and decode entities, preserving line structure.
pub fn render_visible_text(markup: &str) -> String {
    markup
        .split('\n')
        .map(|line| {
            let stripped = HTML_TAG_RE.replace_all(line, "");
            ENTITIES
                .iter()
                .fold(stripped.into_owned(), |text, (entity, decoded)| {
                    text.replace(entity, decoded)
                })
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_strips_tags() {
        assert_eq!(render_visible_text("<p>Hello world</p>"), "Hello world");
        assert_eq!(
            render_visible_text("<div>Hello <strong>world</strong></div>"),
            "Hello world"
        );
        assert_eq!(render_visible_text("No markup here"), "No markup here");
        assert_eq!(render_visible_text("<b>foo</b>bar"), "foobar");
    }

    #[test]
    fn test_render_preserves_lines() {
        let visible = render_visible_text("<h1>Title</h1>\n<p>body</p>\n\n<p>end</p>");
        assert_eq!(visible, "Title\nbody\n\nend");
    }

    #[test]
    fn test_render_decodes_entities() {
        assert_eq!(render_visible_text("a &lt;b&gt; &amp; c"), "a <b> & c");
        assert_eq!(render_visible_text("&amp;lt;"), "&lt;");
        assert_eq!(render_visible_text("&quot;hi&quot;&nbsp;&#39;"), "\"hi\" '");
    }

    #[test]
    fn test_highlights_scroll_to_current_line() {
        let doc = RenderedDocument::new("page.html", "<p>one</p>\n<p>two foo</p>");
        let visible = doc.visible_text();
        let start = visible.find("foo").unwrap();

        doc.apply_highlights(&[start..start + 3], Some(0));

        assert_eq!(doc.scrolled_to(), Some(1));
        assert_eq!(doc.marks().len(), 1);

        doc.clear_highlights();
        assert!(doc.marks().is_empty());
    }

    #[test]
    fn test_set_markup_rerenders() {
        let doc = RenderedDocument::new("page.html", "<p>old</p>");
        doc.set_markup("<p>new</p>");

        assert_eq!(doc.visible_text(), "new");
        assert_eq!(doc.markup(), "<p>new</p>");
    }
}
