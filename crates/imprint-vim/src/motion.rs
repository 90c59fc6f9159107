//! Motion definitions and the motion resolver.
//!
//! Motions describe cursor movements that can be used standalone or combined
//! with operators (d, c, y, >, <) to affect text ranges. Resolution is a pure
//! function of the buffer, the starting position and the motion (which carries
//! its own count).
//!
//! Words are whitespace-delimited tokens; a line break counts as whitespace.

use crate::host::TextBuffer;
use crate::position::Position;

/// Whether a character search stops on the character or next to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindKind {
    /// `f` / `F`: land on the character.
    Find,
    /// `t` / `T`: land just before (or after, backward) the character.
    Till,
}

/// A remembered `f`/`F`/`t`/`T`, replayed by `;` and `,`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharSearch {
    pub ch: char,
    pub kind: FindKind,
    pub forward: bool,
}

impl CharSearch {
    /// The same search in the opposite direction (for `,`).
    pub fn reversed(self) -> Self {
        Self {
            forward: !self.forward,
            ..self
        }
    }
}

/// A motion describing cursor movement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Motion {
    // Character movements
    /// Move left by count characters (`h`).
    Left(usize),
    /// Move right by count characters (`l`).
    Right(usize),
    /// Move up by count lines (`k`).
    Up(usize),
    /// Move down by count lines (`j`).
    Down(usize),

    // Token movements
    /// Start of the next token, count times (`w`).
    WordForward(usize),
    /// Start of the previous token, count times (`b`).
    WordBackward(usize),
    /// End of the current/next token, count times (`e`).
    WordEnd(usize),
    /// End of the previous token, count times (`ge`).
    WordEndBackward(usize),

    // Line movements
    /// Column 1 (`0`).
    LineStart,
    /// First non-blank character (`^`).
    LineFirstNonBlank,
    /// Last character of the line, count-1 lines down (`$`).
    LineEnd(usize),

    // Document movements
    /// First line, or the given line (`gg`, `5gg`).
    DocumentStart(Option<usize>),
    /// Last line, or the given line (`G`, `5G`).
    DocumentEnd(Option<usize>),

    // Paragraph movements
    /// Next blank line, count times (`}`).
    ParagraphForward(usize),
    /// Previous blank line, count times (`{`).
    ParagraphBackward(usize),

    /// `f`/`F`/`t`/`T` on the current line. `repeat` is set for `;`/`,` so a
    /// till search does not get stuck next to its own target.
    FindChar {
        search: CharSearch,
        count: usize,
        repeat: bool,
    },

    /// Bracket matching `()[]{}` (`%`).
    MatchingBracket,

    // Viewport movements (need the host's visible range)
    /// First visible line, or count-1 below it (`H`).
    ScreenTop(usize),
    /// Middle visible line (`M`).
    ScreenMiddle,
    /// Last visible line, or count-1 above it (`L`).
    ScreenBottom(usize),

    // Stateful movements (resolved by the engine)
    /// Next/previous regex match (`n`, `N`, `*`, `#`).
    Search {
        pattern: String,
        forward: bool,
        count: usize,
    },
    /// Jump to a mark, linewise for `'` and exact for `` ` ``.
    Mark { name: char, linewise: bool },
}

impl Motion {
    /// Returns true if this motion operates linewise (affects whole lines).
    pub fn is_linewise(&self) -> bool {
        matches!(
            self,
            Motion::Up(_)
                | Motion::Down(_)
                | Motion::DocumentStart(_)
                | Motion::DocumentEnd(_)
                | Motion::ScreenTop(_)
                | Motion::ScreenMiddle
                | Motion::ScreenBottom(_)
                | Motion::Mark { linewise: true, .. }
        )
    }

    /// Returns true if this motion is inclusive (includes the character at the end).
    pub fn is_inclusive(&self) -> bool {
        match self {
            Motion::WordEnd(_)
            | Motion::WordEndBackward(_)
            | Motion::LineEnd(_)
            | Motion::MatchingBracket => true,
            Motion::FindChar { search, .. } => search.forward,
            _ => false,
        }
    }

    /// Returns true if the position before this motion belongs in the jump list.
    pub fn is_jump(&self) -> bool {
        matches!(
            self,
            Motion::DocumentStart(_)
                | Motion::DocumentEnd(_)
                | Motion::MatchingBracket
                | Motion::Search { .. }
                | Motion::Mark { .. }
        )
    }

    /// Get the count for this motion, if applicable.
    pub fn count(&self) -> Option<usize> {
        match self {
            Motion::Left(n)
            | Motion::Right(n)
            | Motion::Up(n)
            | Motion::Down(n)
            | Motion::WordForward(n)
            | Motion::WordBackward(n)
            | Motion::WordEnd(n)
            | Motion::WordEndBackward(n)
            | Motion::LineEnd(n)
            | Motion::ParagraphForward(n)
            | Motion::ParagraphBackward(n)
            | Motion::ScreenTop(n)
            | Motion::ScreenBottom(n) => Some(*n),
            Motion::FindChar { count, .. } | Motion::Search { count, .. } => Some(*count),
            Motion::DocumentStart(n) | Motion::DocumentEnd(n) => *n,
            _ => None,
        }
    }

    /// Create a motion with a count applied.
    pub fn with_count(self, count: usize) -> Self {
        match self {
            Motion::Left(_) => Motion::Left(count),
            Motion::Right(_) => Motion::Right(count),
            Motion::Up(_) => Motion::Up(count),
            Motion::Down(_) => Motion::Down(count),
            Motion::WordForward(_) => Motion::WordForward(count),
            Motion::WordBackward(_) => Motion::WordBackward(count),
            Motion::WordEnd(_) => Motion::WordEnd(count),
            Motion::WordEndBackward(_) => Motion::WordEndBackward(count),
            Motion::LineEnd(_) => Motion::LineEnd(count),
            Motion::ParagraphForward(_) => Motion::ParagraphForward(count),
            Motion::ParagraphBackward(_) => Motion::ParagraphBackward(count),
            Motion::ScreenTop(_) => Motion::ScreenTop(count),
            Motion::ScreenBottom(_) => Motion::ScreenBottom(count),
            Motion::DocumentStart(_) => Motion::DocumentStart(Some(count)),
            Motion::DocumentEnd(_) => Motion::DocumentEnd(Some(count)),
            Motion::FindChar { search, repeat, .. } => Motion::FindChar {
                search,
                count,
                repeat,
            },
            Motion::Search {
                pattern, forward, ..
            } => Motion::Search {
                pattern,
                forward,
                count,
            },
            // These don't have counts
            other => other,
        }
    }

    /// Resolve a buffer-only motion from `from`.
    ///
    /// Returns `None` when the motion cannot move at all (no matching
    /// character, bracket, or line in that direction). Viewport, search and
    /// mark motions return `None` here; the engine resolves them with its own
    /// state. The returned column may be `len + 1`.
    pub fn resolve<B: TextBuffer + ?Sized>(&self, buffer: &B, from: Position) -> Option<Position> {
        let from = buffer.clamp(from, true);
        match self {
            Motion::Left(n) => Some(from.with_column(from.column.saturating_sub(*n).max(1))),
            Motion::Right(n) => {
                let len = buffer.line_len(from.line);
                Some(from.with_column((from.column + n).min(len + 1)))
            }
            Motion::Up(n) => {
                if from.line == 1 {
                    return None;
                }
                Some(Position::new(from.line.saturating_sub(*n).max(1), from.column))
            }
            Motion::Down(n) => {
                let last = buffer.line_count();
                if from.line >= last {
                    return None;
                }
                Some(Position::new((from.line + n).min(last), from.column))
            }
            Motion::WordForward(n) => Some(repeat(*n, from, |p| word_forward(buffer, p))),
            Motion::WordBackward(n) => Some(repeat(*n, from, |p| word_backward(buffer, p))),
            Motion::WordEnd(n) => Some(repeat(*n, from, |p| word_end(buffer, p))),
            Motion::WordEndBackward(n) => {
                Some(repeat(*n, from, |p| word_end_backward(buffer, p)))
            }
            Motion::LineStart => Some(from.with_column(1)),
            Motion::LineFirstNonBlank => {
                Some(from.with_column(buffer.first_non_blank(from.line)))
            }
            Motion::LineEnd(n) => {
                let line = (from.line + n.saturating_sub(1)).min(buffer.line_count());
                Some(Position::new(line, buffer.line_len(line).max(1)))
            }
            Motion::DocumentStart(line) => {
                let line = line.unwrap_or(1).clamp(1, buffer.line_count().max(1));
                Some(Position::new(line, buffer.first_non_blank(line)))
            }
            Motion::DocumentEnd(line) => {
                let line = line
                    .unwrap_or_else(|| buffer.line_count())
                    .clamp(1, buffer.line_count().max(1));
                Some(Position::new(line, buffer.first_non_blank(line)))
            }
            Motion::ParagraphForward(n) => Some(repeat(*n, from, |p| paragraph_forward(buffer, p))),
            Motion::ParagraphBackward(n) => {
                Some(repeat(*n, from, |p| paragraph_backward(buffer, p)))
            }
            Motion::FindChar {
                search,
                count,
                repeat,
            } => find_char(buffer, from, *search, *count, *repeat),
            Motion::MatchingBracket => matching_bracket(buffer, from),
            Motion::ScreenTop(_)
            | Motion::ScreenMiddle
            | Motion::ScreenBottom(_)
            | Motion::Search { .. }
            | Motion::Mark { .. } => None,
        }
    }
}

impl Default for Motion {
    fn default() -> Self {
        Motion::Right(1)
    }
}

/// The line a viewport motion lands on, given the visible `(first, last)` lines.
pub fn screen_line(motion: &Motion, visible: (usize, usize)) -> Option<usize> {
    let (first, last) = visible;
    let last = last.max(first);
    match motion {
        Motion::ScreenTop(n) => Some((first + n.saturating_sub(1)).min(last)),
        Motion::ScreenMiddle => Some(first + (last - first) / 2),
        Motion::ScreenBottom(n) => Some(last.saturating_sub(n.saturating_sub(1)).max(first)),
        _ => None,
    }
}

fn repeat(count: usize, from: Position, mut step: impl FnMut(Position) -> Position) -> Position {
    let mut pos = from;
    for _ in 0..count.max(1) {
        let next = step(pos);
        if next == pos {
            break;
        }
        pos = next;
    }
    pos
}

// =============================================================================
// Character stepping: columns run 1..=len+1, where len+1 is the line break
// (or the end of the buffer on the last line) and reads as whitespace.
// =============================================================================

fn is_blank_at<B: TextBuffer + ?Sized>(buffer: &B, pos: Position) -> bool {
    buffer.char_at(pos).map_or(true, char::is_whitespace)
}

fn step_forward<B: TextBuffer + ?Sized>(buffer: &B, pos: Position) -> Option<Position> {
    if pos.column <= buffer.line_len(pos.line) {
        Some(pos.with_column(pos.column + 1))
    } else if pos.line < buffer.line_count() {
        Some(Position::new(pos.line + 1, 1))
    } else {
        None
    }
}

fn step_back<B: TextBuffer + ?Sized>(buffer: &B, pos: Position) -> Option<Position> {
    if pos.column > 1 {
        Some(pos.with_column(pos.column - 1))
    } else if pos.line > 1 {
        Some(Position::new(pos.line - 1, buffer.line_len(pos.line - 1) + 1))
    } else {
        None
    }
}

/// `w`: next token on this line, else column 1 of the next line.
fn word_forward<B: TextBuffer + ?Sized>(buffer: &B, pos: Position) -> Position {
    let chars: Vec<char> = buffer.line(pos.line).chars().collect();
    let mut i = pos.column - 1;

    while i < chars.len() && !chars[i].is_whitespace() {
        i += 1;
    }
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }

    if i < chars.len() {
        pos.with_column(i + 1)
    } else if pos.line < buffer.line_count() {
        Position::new(pos.line + 1, 1)
    } else {
        pos.with_column(chars.len() + 1)
    }
}

/// `b`: start of the previous token.
fn word_backward<B: TextBuffer + ?Sized>(buffer: &B, pos: Position) -> Position {
    let Some(mut p) = step_back(buffer, pos) else {
        return pos;
    };
    while is_blank_at(buffer, p) {
        match step_back(buffer, p) {
            Some(prev) => p = prev,
            None => return Position::origin(),
        }
    }
    while let Some(prev) = step_back(buffer, p) {
        if is_blank_at(buffer, prev) {
            break;
        }
        p = prev;
    }
    p
}

/// `e`: last character of the current or next token.
fn word_end<B: TextBuffer + ?Sized>(buffer: &B, pos: Position) -> Position {
    let Some(mut p) = step_forward(buffer, pos) else {
        return pos;
    };
    while is_blank_at(buffer, p) {
        match step_forward(buffer, p) {
            Some(next) => p = next,
            None => return p,
        }
    }
    while let Some(next) = step_forward(buffer, p) {
        if is_blank_at(buffer, next) {
            break;
        }
        p = next;
    }
    p
}

/// `ge`: last character of the previous token.
fn word_end_backward<B: TextBuffer + ?Sized>(buffer: &B, pos: Position) -> Position {
    let mut p = pos;
    while !is_blank_at(buffer, p) {
        match step_back(buffer, p) {
            Some(prev) => p = prev,
            None => return Position::origin(),
        }
    }
    while is_blank_at(buffer, p) {
        match step_back(buffer, p) {
            Some(prev) => p = prev,
            None => return Position::origin(),
        }
    }
    p
}

fn is_empty_line<B: TextBuffer + ?Sized>(buffer: &B, line: usize) -> bool {
    buffer.line(line).trim().is_empty()
}

fn paragraph_forward<B: TextBuffer + ?Sized>(buffer: &B, pos: Position) -> Position {
    let last = buffer.line_count();
    let mut line = pos.line;
    while line < last && is_empty_line(buffer, line) {
        line += 1;
    }
    while line < last && !is_empty_line(buffer, line) {
        line += 1;
    }
    if is_empty_line(buffer, line) {
        Position::new(line, 1)
    } else {
        Position::new(line, buffer.line_len(line) + 1)
    }
}

fn paragraph_backward<B: TextBuffer + ?Sized>(buffer: &B, pos: Position) -> Position {
    let mut line = pos.line;
    while line > 1 && is_empty_line(buffer, line) {
        line -= 1;
    }
    while line > 1 && !is_empty_line(buffer, line) {
        line -= 1;
    }
    Position::new(line, 1)
}

fn find_char<B: TextBuffer + ?Sized>(
    buffer: &B,
    from: Position,
    search: CharSearch,
    count: usize,
    repeat: bool,
) -> Option<Position> {
    let chars: Vec<char> = buffer.line(from.line).chars().collect();
    let idx = from.column - 1;
    // A repeated till search skips the target it is already standing next to.
    let skip = usize::from(repeat && search.kind == FindKind::Till);
    let count = count.max(1);

    let found = if search.forward {
        chars
            .iter()
            .enumerate()
            .skip(idx + 1 + skip)
            .filter(|(_, c)| **c == search.ch)
            .nth(count - 1)
            .map(|(i, _)| i)
    } else {
        chars
            .iter()
            .enumerate()
            .take(idx.checked_sub(skip)?)
            .rev()
            .filter(|(_, c)| **c == search.ch)
            .nth(count - 1)
            .map(|(i, _)| i)
    }?;

    let column = match (search.kind, search.forward) {
        (FindKind::Find, _) => found + 1,
        (FindKind::Till, true) => found,
        (FindKind::Till, false) => found + 2,
    };
    Some(from.with_column(column))
}

const BRACKET_PAIRS: [(char, char); 3] = [('(', ')'), ('[', ']'), ('{', '}')];

/// `%`: the bracket under or after the cursor on this line, and its partner
/// anywhere in the buffer.
fn matching_bracket<B: TextBuffer + ?Sized>(buffer: &B, from: Position) -> Option<Position> {
    let chars: Vec<char> = buffer.line(from.line).chars().collect();
    let (start_idx, bracket) = chars
        .iter()
        .enumerate()
        .skip(from.column - 1)
        .find(|(_, c)| BRACKET_PAIRS.iter().any(|&(o, cl)| **c == o || **c == cl))
        .map(|(i, &c)| (i, c))?;

    let (open, close) = BRACKET_PAIRS
        .iter()
        .copied()
        .find(|&(o, c)| bracket == o || bracket == c)?;
    let forward = bracket == open;
    let mut depth = 0usize;
    let mut pos = Position::new(from.line, start_idx + 1);

    loop {
        match buffer.char_at(pos) {
            Some(c) if c == open || c == close => {
                let opens = (c == open) == forward;
                if opens {
                    depth += 1;
                } else {
                    depth -= 1;
                    if depth == 0 {
                        return Some(pos);
                    }
                }
            }
            _ => {}
        }
        pos = if forward {
            step_forward(buffer, pos)?
        } else {
            step_back(buffer, pos)?
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Lines(Vec<&'static str>);

    impl TextBuffer for Lines {
        fn line(&self, line: usize) -> String {
            line.checked_sub(1)
                .and_then(|i| self.0.get(i))
                .map(|s| s.to_string())
                .unwrap_or_default()
        }

        fn line_count(&self) -> usize {
            self.0.len().max(1)
        }
    }

    fn at(line: usize, column: usize) -> Position {
        Position::new(line, column)
    }

    #[test]
    fn test_document_motions_without_lines() {
        struct Empty;

        impl TextBuffer for Empty {
            fn line(&self, _line: usize) -> String {
                String::new()
            }

            fn line_count(&self) -> usize {
                0
            }
        }

        assert_eq!(Motion::DocumentStart(None).resolve(&Empty, at(1, 1)), Some(at(1, 1)));
        assert_eq!(Motion::DocumentEnd(None).resolve(&Empty, at(1, 1)), Some(at(1, 1)));
        assert_eq!(Motion::DocumentEnd(Some(5)).resolve(&Empty, at(1, 1)), Some(at(1, 1)));
    }

    #[test]
    fn test_linewise_motions() {
        assert!(Motion::Up(1).is_linewise());
        assert!(Motion::DocumentEnd(None).is_linewise());
        assert!(Motion::Mark {
            name: 'a',
            linewise: true
        }
        .is_linewise());
        assert!(!Motion::WordForward(1).is_linewise());
    }

    #[test]
    fn test_inclusive_motions() {
        assert!(Motion::WordEnd(1).is_inclusive());
        assert!(Motion::WordEndBackward(1).is_inclusive());
        assert!(Motion::LineEnd(1).is_inclusive());
        assert!(!Motion::WordForward(1).is_inclusive());
        let backward = CharSearch {
            ch: 'x',
            kind: FindKind::Find,
            forward: false,
        };
        assert!(!Motion::FindChar {
            search: backward,
            count: 1,
            repeat: false
        }
        .is_inclusive());
    }

    #[test]
    fn test_with_count() {
        assert_eq!(Motion::WordForward(1).with_count(5), Motion::WordForward(5));
        assert_eq!(
            Motion::DocumentEnd(None).with_count(3),
            Motion::DocumentEnd(Some(3))
        );
        assert_eq!(Motion::LineStart.with_count(5), Motion::LineStart);
        assert_eq!(Motion::MatchingBracket.count(), None);
    }

    #[test]
    fn test_horizontal_clamping() {
        let buf = Lines(vec!["hello"]);
        for column in 1..=5 {
            for n in 1..=8 {
                let left = Motion::Left(n).resolve(&buf, at(1, column)).unwrap();
                assert_eq!(left.column, column.saturating_sub(n).max(1));
                let right = Motion::Right(n).resolve(&buf, at(1, column)).unwrap();
                assert_eq!(buf.clamp(right, false).column, (column + n).min(5));
            }
        }
    }

    #[test]
    fn test_vertical_bounds() {
        let buf = Lines(vec!["a", "b", "c"]);
        assert_eq!(Motion::Down(5).resolve(&buf, at(1, 1)), Some(at(3, 1)));
        assert_eq!(Motion::Down(1).resolve(&buf, at(3, 1)), None);
        assert_eq!(Motion::Up(1).resolve(&buf, at(1, 1)), None);
        assert_eq!(Motion::Up(9).resolve(&buf, at(3, 1)), Some(at(1, 1)));
    }

    #[test]
    fn test_word_forward() {
        let buf = Lines(vec!["foo bar baz", "next"]);
        assert_eq!(Motion::WordForward(1).resolve(&buf, at(1, 1)), Some(at(1, 5)));
        assert_eq!(Motion::WordForward(2).resolve(&buf, at(1, 1)), Some(at(1, 9)));
        assert_eq!(Motion::WordForward(1).resolve(&buf, at(1, 9)), Some(at(2, 1)));
        assert_eq!(Motion::WordForward(1).resolve(&buf, at(2, 2)), Some(at(2, 5)));
    }

    #[test]
    fn test_word_forward_lands_on_column_one() {
        let buf = Lines(vec!["end", "    indented"]);
        assert_eq!(Motion::WordForward(1).resolve(&buf, at(1, 1)), Some(at(2, 1)));
    }

    #[test]
    fn test_word_backward() {
        let buf = Lines(vec!["foo bar", "  baz"]);
        assert_eq!(Motion::WordBackward(1).resolve(&buf, at(2, 3)), Some(at(1, 5)));
        assert_eq!(Motion::WordBackward(1).resolve(&buf, at(1, 6)), Some(at(1, 5)));
        assert_eq!(Motion::WordBackward(2).resolve(&buf, at(2, 4)), Some(at(1, 5)));
        assert_eq!(Motion::WordBackward(5).resolve(&buf, at(2, 4)), Some(at(1, 1)));
    }

    #[test]
    fn test_word_end() {
        let buf = Lines(vec!["foo bar", "baz"]);
        assert_eq!(Motion::WordEnd(1).resolve(&buf, at(1, 1)), Some(at(1, 3)));
        assert_eq!(Motion::WordEnd(1).resolve(&buf, at(1, 3)), Some(at(1, 7)));
        assert_eq!(Motion::WordEnd(1).resolve(&buf, at(1, 7)), Some(at(2, 3)));
    }

    #[test]
    fn test_word_end_backward() {
        let buf = Lines(vec!["foo bar", "baz"]);
        assert_eq!(
            Motion::WordEndBackward(1).resolve(&buf, at(1, 6)),
            Some(at(1, 3))
        );
        assert_eq!(
            Motion::WordEndBackward(1).resolve(&buf, at(2, 2)),
            Some(at(1, 7))
        );
        assert_eq!(
            Motion::WordEndBackward(1).resolve(&buf, at(1, 2)),
            Some(at(1, 1))
        );
    }

    #[test]
    fn test_line_motions() {
        let buf = Lines(vec!["   text here", "x"]);
        assert_eq!(Motion::LineStart.resolve(&buf, at(1, 6)), Some(at(1, 1)));
        assert_eq!(
            Motion::LineFirstNonBlank.resolve(&buf, at(1, 9)),
            Some(at(1, 4))
        );
        assert_eq!(Motion::LineEnd(1).resolve(&buf, at(1, 1)), Some(at(1, 12)));
        assert_eq!(Motion::LineEnd(2).resolve(&buf, at(1, 1)), Some(at(2, 1)));
    }

    #[test]
    fn test_document_motions() {
        let buf = Lines(vec!["one", "  two", "three"]);
        assert_eq!(
            Motion::DocumentStart(None).resolve(&buf, at(3, 2)),
            Some(at(1, 1))
        );
        assert_eq!(
            Motion::DocumentEnd(None).resolve(&buf, at(1, 1)),
            Some(at(3, 1))
        );
        assert_eq!(
            Motion::DocumentEnd(Some(2)).resolve(&buf, at(1, 1)),
            Some(at(2, 3))
        );
        assert_eq!(
            Motion::DocumentStart(Some(99)).resolve(&buf, at(1, 1)),
            Some(at(3, 1))
        );
    }

    #[test]
    fn test_find_char() {
        let buf = Lines(vec!["a,b,c,d"]);
        let find = |kind, forward| CharSearch {
            ch: ',',
            kind,
            forward,
        };
        let motion = |search, count, repeat| Motion::FindChar {
            search,
            count,
            repeat,
        };

        let f = find(FindKind::Find, true);
        assert_eq!(motion(f, 1, false).resolve(&buf, at(1, 1)), Some(at(1, 2)));
        assert_eq!(motion(f, 2, false).resolve(&buf, at(1, 1)), Some(at(1, 4)));
        assert_eq!(motion(f, 9, false).resolve(&buf, at(1, 1)), None);

        let t = find(FindKind::Till, true);
        assert_eq!(motion(t, 1, false).resolve(&buf, at(1, 1)), Some(at(1, 1)));
        assert_eq!(motion(t, 1, true).resolve(&buf, at(1, 1)), Some(at(1, 3)));

        let big_f = find(FindKind::Find, false);
        assert_eq!(motion(big_f, 1, false).resolve(&buf, at(1, 7)), Some(at(1, 6)));

        let big_t = find(FindKind::Till, false);
        assert_eq!(motion(big_t, 1, false).resolve(&buf, at(1, 7)), Some(at(1, 7)));
        assert_eq!(motion(big_t, 1, true).resolve(&buf, at(1, 7)), Some(at(1, 5)));
    }

    #[test]
    fn test_find_char_stays_on_line() {
        let buf = Lines(vec!["abc", "x"]);
        let search = CharSearch {
            ch: 'x',
            kind: FindKind::Find,
            forward: true,
        };
        let motion = Motion::FindChar {
            search,
            count: 1,
            repeat: false,
        };
        assert_eq!(motion.resolve(&buf, at(1, 1)), None);
    }

    #[test]
    fn test_matching_bracket() {
        let buf = Lines(vec!["fn(a, [b]) {", "  x", "}"]);
        assert_eq!(Motion::MatchingBracket.resolve(&buf, at(1, 3)), Some(at(1, 10)));
        assert_eq!(Motion::MatchingBracket.resolve(&buf, at(1, 10)), Some(at(1, 3)));
        assert_eq!(Motion::MatchingBracket.resolve(&buf, at(1, 1)), Some(at(1, 10)));
        assert_eq!(Motion::MatchingBracket.resolve(&buf, at(1, 12)), Some(at(3, 1)));
        assert_eq!(Motion::MatchingBracket.resolve(&buf, at(3, 1)), Some(at(1, 12)));
        assert_eq!(Motion::MatchingBracket.resolve(&buf, at(2, 1)), None);
    }

    #[test]
    fn test_paragraph_motions() {
        let buf = Lines(vec!["a", "b", "", "c", "d"]);
        assert_eq!(
            Motion::ParagraphForward(1).resolve(&buf, at(1, 1)),
            Some(at(3, 1))
        );
        assert_eq!(
            Motion::ParagraphForward(2).resolve(&buf, at(1, 1)),
            Some(at(5, 2))
        );
        assert_eq!(
            Motion::ParagraphBackward(1).resolve(&buf, at(5, 1)),
            Some(at(3, 1))
        );
    }

    #[test]
    fn test_screen_lines() {
        assert_eq!(screen_line(&Motion::ScreenTop(1), (10, 30)), Some(10));
        assert_eq!(screen_line(&Motion::ScreenTop(3), (10, 30)), Some(12));
        assert_eq!(screen_line(&Motion::ScreenMiddle, (10, 30)), Some(20));
        assert_eq!(screen_line(&Motion::ScreenBottom(1), (10, 30)), Some(30));
        assert_eq!(screen_line(&Motion::ScreenBottom(50), (10, 30)), Some(10));
    }
}
