//! Match model representing one located occurrence of a query.

use serde::Serialize;

/// One occurrence of a query inside a searched document.
///
/// `line` and `column` are zero-based; `column` counts characters, not bytes.
/// `index` is the match's ordinal within its session, assigned densely from 0
/// in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchMatch {
    /// Text of the exact match itself
    pub text: String,

    /// Fragment of the surrounding line containing the match
    pub fragment: String,

    /// Line number of the match
    pub line: usize,

    /// Column of the first matched character
    pub column: usize,

    /// Index among the other matches of the session
    pub index: usize,
}

impl SearchMatch {
    /// Create a new match.
    pub fn new(
        text: impl Into<String>,
        fragment: impl Into<String>,
        line: usize,
        column: usize,
        index: usize,
    ) -> Self {
        Self {
            text: text.into(),
            fragment: fragment.into(),
            line,
            column,
            index,
        }
    }

    /// One-based "line:column" label for display.
    pub fn location_label(&self) -> String {
        format!("{}:{}", self.line + 1, self.column + 1)
    }
}
