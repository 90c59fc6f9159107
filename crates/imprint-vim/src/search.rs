//! Regex search over a [`TextBuffer`].
//!
//! The buffer is searched as one string (lines joined with `\n`) so patterns
//! may span lines. Match offsets are converted back to line/column positions.

use regex::{Regex, RegexBuilder};

use crate::error::{Result, VimError};
use crate::host::TextBuffer;
use crate::position::Position;

/// The last `/` or `?` search, reused by `n` and `N`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastSearch {
    pub pattern: String,
    pub forward: bool,
}

/// A located match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    pub start: Position,
    pub end: Position,
    /// The search ran off one end of the buffer and continued from the other.
    pub wrapped: bool,
}

/// Compile a search pattern.
pub fn build_regex(pattern: &str, ignore_case: bool) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(ignore_case)
        .multi_line(true)
        .build()
        .map_err(|err| {
            tracing::debug!(pattern, error = %err, "invalid search pattern");
            VimError::InvalidPattern {
                pattern: pattern.to_string(),
            }
        })
}

/// Byte offsets of each line start in the joined buffer text.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(text: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self { starts }
    }

    fn offset_of(&self, text: &str, pos: Position) -> usize {
        let line_idx = pos.line.clamp(1, self.starts.len()) - 1;
        let line_start = self.starts[line_idx];
        let line_end = self
            .starts
            .get(line_idx + 1)
            .map(|next| next - 1)
            .unwrap_or(text.len());
        text[line_start..line_end]
            .char_indices()
            .nth(pos.column.saturating_sub(1))
            .map(|(i, _)| line_start + i)
            .unwrap_or(line_end)
    }

    fn position_of(&self, text: &str, offset: usize) -> Position {
        let line_idx = match self.starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let line_start = self.starts[line_idx];
        Position::new(line_idx + 1, text[line_start..offset].chars().count() + 1)
    }
}

/// Find the next match of `regex` after `from` (or before it, backward).
///
/// A match starting exactly at `from` does not count. When nothing is found
/// in the search direction and `wraps` is set, the search continues from the
/// other end of the buffer.
pub fn find<B: TextBuffer + ?Sized>(
    buffer: &B,
    from: Position,
    regex: &Regex,
    forward: bool,
    wraps: bool,
) -> Option<SearchMatch> {
    let text = buffer.full_text();
    let index = LineIndex::new(&text);
    let cursor = index.offset_of(&text, from);
    let matches: Vec<(usize, usize)> = regex
        .find_iter(&text)
        .map(|m| (m.start(), m.end()))
        .collect();

    let (hit, wrapped) = if forward {
        match matches.iter().find(|(start, _)| *start > cursor) {
            Some(m) => (*m, false),
            None if wraps => (*matches.first()?, true),
            None => return None,
        }
    } else {
        match matches.iter().rev().find(|(start, _)| *start < cursor) {
            Some(m) => (*m, false),
            None if wraps => (*matches.last()?, true),
            None => return None,
        }
    };

    Some(SearchMatch {
        start: index.position_of(&text, hit.0),
        end: index.position_of(&text, hit.1),
        wrapped,
    })
}

/// The keyword under or after the cursor on its line, for `*` and `#`.
pub fn word_under_cursor<B: TextBuffer + ?Sized>(buffer: &B, pos: Position) -> Option<String> {
    let chars: Vec<char> = buffer.line(pos.line).chars().collect();
    let is_keyword = |c: char| c.is_alphanumeric() || c == '_';
    let mut start = pos.column.saturating_sub(1);

    if start >= chars.len() {
        return None;
    }
    if is_keyword(chars[start]) {
        while start > 0 && is_keyword(chars[start - 1]) {
            start -= 1;
        }
    } else {
        start += chars[start..].iter().position(|&c| is_keyword(c))?;
    }

    let word: String = chars[start..].iter().take_while(|&&c| is_keyword(c)).collect();
    Some(word)
}

/// A whole-word pattern matching `word` literally.
pub fn whole_word_pattern(word: &str) -> String {
    format!(r"\b{}\b", regex::escape(word))
}
