//! Current-match bookkeeping with wraparound navigation.

use super::matcher::LocatedMatch;
use crate::models::SearchMatch;
use std::ops::Range;

/// The match list of one search plus the position of the current match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchCursor {
    matches: Vec<SearchMatch>,
    ranges: Vec<Range<usize>>,
    current: Option<usize>,
}

impl MatchCursor {
    /// Build a cursor positioned on the first match, if there is one.
    pub fn new(located: Vec<LocatedMatch>) -> Self {
        Self::with_current(located, Some(0))
    }

    /// Build a cursor positioned as close to `preferred` as the new match
    /// list allows.
    pub fn with_current(located: Vec<LocatedMatch>, preferred: Option<usize>) -> Self {
        let (ranges, matches): (Vec<_>, Vec<_>) = located
            .into_iter()
            .map(|m| (m.range, m.search_match))
            .unzip();

        let current = match matches.len() {
            0 => None,
            len => Some(preferred.unwrap_or(0).min(len - 1)),
        };

        Self {
            matches,
            ranges,
            current,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn matches(&self) -> &[SearchMatch] {
        &self.matches
    }

    pub fn ranges(&self) -> &[Range<usize>] {
        &self.ranges
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_match(&self) -> Option<&SearchMatch> {
        self.current.and_then(|i| self.matches.get(i))
    }

    /// Step to the next match, wrapping after the last.
    pub fn advance(&mut self) -> Option<&SearchMatch> {
        let len = self.matches.len();
        if len == 0 {
            return None;
        }
        self.current = Some(self.current.map_or(0, |i| (i + 1) % len));
        self.current_match()
    }

    /// Step to the previous match, wrapping before the first.
    pub fn retreat(&mut self) -> Option<&SearchMatch> {
        let len = self.matches.len();
        if len == 0 {
            return None;
        }
        self.current = Some(self.current.map_or(len - 1, |i| (i + len - 1) % len));
        self.current_match()
    }
}
