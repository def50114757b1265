//! Match location and fragment extraction shared by the built-in providers.

use crate::config::SearchConfig;
use crate::models::SearchMatch;
use regex::Regex;
use std::ops::Range;

const ELLIPSIS: &str = "...";

/// A match together with the byte range it occupies in the searched text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedMatch {
    pub range: Range<usize>,
    pub search_match: SearchMatch,
}

/// Find every non-empty match of `query` in `text`, in source order.
///
/// Zero-length matches are skipped since there is nothing to highlight.
pub fn find_matches(text: &str, query: &Regex, config: &SearchConfig) -> Vec<LocatedMatch> {
    let line_starts = line_starts(text);

    query
        .find_iter(text)
        .filter(|m| !m.is_empty())
        .enumerate()
        .map(|(index, m)| {
            let line = line_starts.partition_point(|&start| start <= m.start()) - 1;
            let line_start = line_starts[line];
            let line_end = line_end(text, line_start);
            let line_text = &text[line_start..line_end];

            let column = text[line_start..m.start()].chars().count();
            let match_end = m.end().min(line_end).max(m.start());
            let fragment = build_fragment(
                line_text,
                m.start() - line_start,
                match_end - line_start,
                config,
            );

            LocatedMatch {
                range: m.range(),
                search_match: SearchMatch::new(m.as_str(), fragment, line, column, index),
            }
        })
        .collect()
}

/// Byte offset of the first character of every line.
fn line_starts(text: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(text.match_indices('\n').map(|(i, _)| i + 1))
        .collect()
}

/// Byte offset just past the visible end of the line starting at `start`.
fn line_end(text: &str, start: usize) -> usize {
    let end = text[start..]
        .find('\n')
        .map(|i| start + i)
        .unwrap_or(text.len());

    if end > start && text.as_bytes()[end - 1] == b'\r' {
        end - 1
    } else {
        end
    }
}

/// Generate a fragment of `line` with context around `start..end`.
fn build_fragment(line: &str, start: usize, end: usize, config: &SearchConfig) -> String {
    let start = start.min(line.len());
    let end = end.clamp(start, line.len());

    let from = line[..start]
        .char_indices()
        .rev()
        .take(config.context_chars)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(start);
    let to = line[end..]
        .char_indices()
        .nth(config.context_chars)
        .map(|(i, _)| end + i)
        .unwrap_or(line.len());

    let mut fragment = String::new();
    if from > 0 {
        fragment.push_str(ELLIPSIS);
    }
    fragment.push_str(&line[from..to]);
    if to < line.len() {
        fragment.push_str(ELLIPSIS);
    }

    // Truncate if too long
    if fragment.chars().count() > config.max_fragment_length {
        let keep = config.max_fragment_length.saturating_sub(ELLIPSIS.len());
        fragment = fragment.chars().take(keep).collect();
        fragment.push_str(ELLIPSIS);
    }

    fragment
}
