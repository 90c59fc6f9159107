//! Text object definitions and resolution.
//!
//! Text objects are used with operators (d, c, y) and in visual mode with the
//! modifiers `i` (inner) and `a` (around):
//! - `diw` - delete inner word (the word itself)
//! - `daw` - delete around word (word plus trailing whitespace)
//! - `ci"` - change inner quote (content between quotes)
//! - `da(` - delete around parens (including the parentheses)
//!
//! Every object is resolved on the cursor's line only.

use crate::host::TextBuffer;
use crate::position::{Position, Range};

/// A text object describing a structured region of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextObject {
    /// A word: a run of keyword characters or a run of punctuation.
    Word,
    /// A WORD: a run of non-whitespace characters.
    BigWord,
    /// Double-quoted string `"..."`.
    DoubleQuote,
    /// Single-quoted string `'...'`.
    SingleQuote,
    /// Backtick-quoted string `` `...` ``.
    BacktickQuote,
    /// Parentheses `(...)`.
    Parentheses,
    /// Square brackets `[...]`.
    SquareBrackets,
    /// Curly braces `{...}`.
    CurlyBraces,
    /// Angle brackets `<...>`.
    AngleBrackets,
}

/// Modifier for text object selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextObjectModifier {
    /// Select the inner content (excluding delimiters/whitespace).
    Inner,
    /// Select around (including delimiters and/or surrounding whitespace).
    Around,
}

impl TextObjectModifier {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'i' => Some(TextObjectModifier::Inner),
            'a' => Some(TextObjectModifier::Around),
            _ => None,
        }
    }
}

impl TextObject {
    /// Try to create a text object from a character typed after `i` or `a`.
    ///
    /// - `w` -> Word, `W` -> WORD
    /// - `"`, `'`, `` ` `` -> quotes
    /// - `(`, `)`, `b` -> Parentheses
    /// - `[`, `]` -> SquareBrackets
    /// - `{`, `}`, `B` -> CurlyBraces
    /// - `<`, `>` -> AngleBrackets
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'w' => Some(TextObject::Word),
            'W' => Some(TextObject::BigWord),
            '"' => Some(TextObject::DoubleQuote),
            '\'' => Some(TextObject::SingleQuote),
            '`' => Some(TextObject::BacktickQuote),
            '(' | ')' | 'b' => Some(TextObject::Parentheses),
            '[' | ']' => Some(TextObject::SquareBrackets),
            '{' | '}' | 'B' => Some(TextObject::CurlyBraces),
            '<' | '>' => Some(TextObject::AngleBrackets),
            _ => None,
        }
    }

    /// Returns the opening and closing delimiters for paired text objects.
    pub fn delimiters(&self) -> Option<(char, char)> {
        match self {
            TextObject::DoubleQuote => Some(('"', '"')),
            TextObject::SingleQuote => Some(('\'', '\'')),
            TextObject::BacktickQuote => Some(('`', '`')),
            TextObject::Parentheses => Some(('(', ')')),
            TextObject::SquareBrackets => Some(('[', ']')),
            TextObject::CurlyBraces => Some(('{', '}')),
            TextObject::AngleBrackets => Some(('<', '>')),
            TextObject::Word | TextObject::BigWord => None,
        }
    }

    /// Returns true if this text object uses the same character for open and close.
    pub fn is_symmetric(&self) -> bool {
        matches!(
            self,
            TextObject::DoubleQuote | TextObject::SingleQuote | TextObject::BacktickQuote
        )
    }

    /// Returns a description of this text object.
    pub fn description(&self) -> &'static str {
        match self {
            TextObject::Word => "word",
            TextObject::BigWord => "WORD",
            TextObject::DoubleQuote => "double quotes",
            TextObject::SingleQuote => "single quotes",
            TextObject::BacktickQuote => "backticks",
            TextObject::Parentheses => "parentheses",
            TextObject::SquareBrackets => "square brackets",
            TextObject::CurlyBraces => "curly braces",
            TextObject::AngleBrackets => "angle brackets",
        }
    }

    /// Compute the range this object covers around `cursor`.
    ///
    /// Returns `None` when the object does not exist there (empty line, no
    /// quote pair, no enclosing bracket).
    pub fn resolve<B: TextBuffer + ?Sized>(
        &self,
        buffer: &B,
        cursor: Position,
        modifier: TextObjectModifier,
    ) -> Option<Range> {
        let chars: Vec<char> = buffer.line(cursor.line).chars().collect();
        if chars.is_empty() {
            return None;
        }
        let idx = cursor.column.clamp(1, chars.len()) - 1;
        let inner = modifier == TextObjectModifier::Inner;

        let (start, end) = match self {
            TextObject::Word => word_span(&chars, idx, inner, false),
            TextObject::BigWord => word_span(&chars, idx, inner, true),
            _ => {
                let (open, close) = self.delimiters()?;
                let (open_idx, close_idx) = if self.is_symmetric() {
                    quote_pair(&chars, open)?
                } else {
                    bracket_pair(&chars, idx, open, close)?
                };
                if inner {
                    (open_idx + 1, close_idx)
                } else {
                    (open_idx, close_idx + 1)
                }
            }
        };

        Some(Range::new(
            cursor.with_column(start + 1),
            cursor.with_column(end + 1),
        ))
    }
}

fn char_class(c: char, big: bool) -> u8 {
    if c.is_whitespace() {
        0
    } else if big || c.is_alphanumeric() || c == '_' {
        1
    } else {
        2
    }
}

/// Half-open char span of the word object at `idx`.
fn word_span(chars: &[char], idx: usize, inner: bool, big: bool) -> (usize, usize) {
    let class = |i: usize| char_class(chars[i], big);
    let cls = class(idx);

    let mut start = idx;
    while start > 0 && class(start - 1) == cls {
        start -= 1;
    }
    let mut end = idx + 1;
    while end < chars.len() && class(end) == cls {
        end += 1;
    }

    if inner {
        return (start, end);
    }

    if cls == 0 {
        // On whitespace: the gap plus the following token.
        if end < chars.len() {
            let next = class(end);
            while end < chars.len() && class(end) == next {
                end += 1;
            }
        }
    } else if end < chars.len() && class(end) == 0 {
        while end < chars.len() && class(end) == 0 {
            end += 1;
        }
    } else {
        while start > 0 && class(start - 1) == 0 {
            start -= 1;
        }
    }
    (start, end)
}

/// First and last occurrence of `quote` on the line.
fn quote_pair(chars: &[char], quote: char) -> Option<(usize, usize)> {
    let first = chars.iter().position(|&c| c == quote)?;
    let last = chars.iter().rposition(|&c| c == quote)?;
    (first < last).then_some((first, last))
}

/// The innermost unmatched `open`/`close` pair enclosing `idx`.
fn bracket_pair(chars: &[char], idx: usize, open: char, close: char) -> Option<(usize, usize)> {
    let mut depth = 0usize;
    let mut open_idx = None;
    for j in (0..=idx).rev() {
        let c = chars[j];
        if c == close && j != idx {
            depth += 1;
        } else if c == open {
            if depth == 0 {
                open_idx = Some(j);
                break;
            }
            depth -= 1;
        }
    }
    let open_idx = open_idx?;

    depth = 0;
    for (j, &c) in chars.iter().enumerate().skip(open_idx + 1) {
        if c == open {
            depth += 1;
        } else if c == close {
            if depth == 0 {
                return Some((open_idx, j));
            }
            depth -= 1;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Line(&'static str);

    impl TextBuffer for Line {
        fn line(&self, line: usize) -> String {
            if line == 1 {
                self.0.to_string()
            } else {
                String::new()
            }
        }

        fn line_count(&self) -> usize {
            1
        }
    }

    fn text(buf: &Line, obj: char, modifier: char, column: usize) -> Option<String> {
        let obj = TextObject::from_char(obj)?;
        let modifier = TextObjectModifier::from_char(modifier)?;
        obj.resolve(buf, Position::new(1, column), modifier)
            .map(|r| buf.text_in_range(r))
    }

    #[test]
    fn test_from_char() {
        assert_eq!(TextObject::from_char('w'), Some(TextObject::Word));
        assert_eq!(TextObject::from_char('b'), Some(TextObject::Parentheses));
        assert_eq!(TextObject::from_char('B'), Some(TextObject::CurlyBraces));
        assert_eq!(TextObject::from_char('x'), None);
    }

    #[test]
    fn test_delimiters() {
        assert_eq!(TextObject::Parentheses.delimiters(), Some(('(', ')')));
        assert!(TextObject::DoubleQuote.is_symmetric());
        assert!(!TextObject::CurlyBraces.is_symmetric());
        assert_eq!(TextObject::Word.delimiters(), None);
    }

    #[test]
    fn test_inner_word() {
        let buf = Line("foo bar.baz qux");
        assert_eq!(text(&buf, 'w', 'i', 6).as_deref(), Some("bar"));
        assert_eq!(text(&buf, 'w', 'i', 8).as_deref(), Some("."));
        assert_eq!(text(&buf, 'W', 'i', 6).as_deref(), Some("bar.baz"));
        assert_eq!(text(&buf, 'w', 'i', 4).as_deref(), Some(" "));
    }

    #[test]
    fn test_around_word() {
        let buf = Line("foo bar baz");
        assert_eq!(text(&buf, 'w', 'a', 5).as_deref(), Some("bar "));
        // No trailing whitespace: take the leading whitespace instead.
        assert_eq!(text(&buf, 'w', 'a', 10).as_deref(), Some(" baz"));
        assert_eq!(text(&buf, 'w', 'a', 4).as_deref(), Some(" bar"));
    }

    #[test]
    fn test_quotes() {
        let buf = Line(r#"say "hi" and "bye" now"#);
        assert_eq!(text(&buf, '"', 'i', 1).as_deref(), Some(r#"hi" and "bye"#));
        assert_eq!(text(&buf, '"', 'a', 1).as_deref(), Some(r#""hi" and "bye""#));
        assert_eq!(text(&buf, '\'', 'i', 1), None);
    }

    #[test]
    fn test_brackets() {
        let buf = Line("f(a, (b), c)");
        assert_eq!(text(&buf, '(', 'i', 4).as_deref(), Some("a, (b), c"));
        assert_eq!(text(&buf, ')', 'a', 4).as_deref(), Some("(a, (b), c)"));
        assert_eq!(text(&buf, 'b', 'i', 7).as_deref(), Some("b"));
        assert_eq!(text(&buf, '(', 'i', 2).as_deref(), Some("a, (b), c"));
        assert_eq!(text(&buf, '(', 'i', 12).as_deref(), Some("a, (b), c"));
        assert_eq!(text(&buf, '[', 'i', 4), None);
        assert_eq!(text(&buf, '(', 'i', 1), None);
    }

    #[test]
    fn test_empty_brackets() {
        let buf = Line("call()");
        let range = TextObject::Parentheses
            .resolve(&buf, Position::new(1, 5), TextObjectModifier::Inner)
            .unwrap();
        assert!(range.is_empty());
        assert_eq!(range.start, Position::new(1, 6));
    }

    #[test]
    fn test_empty_line() {
        let buf = Line("");
        assert_eq!(text(&buf, 'w', 'i', 1), None);
    }
}
