//! Operators and the editing primitives they are built on.
//!
//! An operator acts over an [`OperatorSpan`] produced by composing a motion
//! or text object with the cursor. The executor owns no state of its own; it
//! reads and writes the buffer through [`TextHost`] and the register store.

use crate::config::VimConfig;
use crate::host::{TextHost, position_after};
use crate::position::{Position, Range};
use crate::registers::{Register, RegisterStore, RegisterWrite};

/// An operator awaiting (or applied to) a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Delete operator (d).
    Delete,
    /// Change operator (c).
    Change,
    /// Yank operator (y).
    Yank,
    /// Indent operator (>).
    Indent,
    /// Dedent operator (<).
    Dedent,
    /// Lowercase operator (gu).
    Lowercase,
    /// Uppercase operator (gU).
    Uppercase,
    /// Toggle-case operator (g~).
    ToggleCase,
}

impl Operator {
    /// The operator started by a single key.
    pub fn from_key(c: char) -> Option<Self> {
        match c {
            'd' => Some(Operator::Delete),
            'c' => Some(Operator::Change),
            'y' => Some(Operator::Yank),
            '>' => Some(Operator::Indent),
            '<' => Some(Operator::Dedent),
            _ => None,
        }
    }

    /// The operator started by `g` followed by `c`.
    pub fn from_g_key(c: char) -> Option<Self> {
        match c {
            'u' => Some(Operator::Lowercase),
            'U' => Some(Operator::Uppercase),
            '~' => Some(Operator::ToggleCase),
            _ => None,
        }
    }

    /// The key that, typed again, applies the operator linewise (`dd`, `guu`).
    pub fn doubled_key(&self) -> char {
        match self {
            Operator::Delete => 'd',
            Operator::Change => 'c',
            Operator::Yank => 'y',
            Operator::Indent => '>',
            Operator::Dedent => '<',
            Operator::Lowercase => 'u',
            Operator::Uppercase => 'U',
            Operator::ToggleCase => '~',
        }
    }

    /// Key notation, for the pending-keys echo.
    pub fn keys(&self) -> &'static str {
        match self {
            Operator::Delete => "d",
            Operator::Change => "c",
            Operator::Yank => "y",
            Operator::Indent => ">",
            Operator::Dedent => "<",
            Operator::Lowercase => "gu",
            Operator::Uppercase => "gU",
            Operator::ToggleCase => "g~",
        }
    }

    /// Returns true if this operator modifies the buffer.
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Operator::Yank)
    }
}

/// The region an operator acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorSpan {
    /// A characterwise, end-exclusive range.
    Chars(Range),
    /// Whole lines, inclusive.
    Lines { first: usize, last: usize },
}

impl OperatorSpan {
    pub fn lines(a: usize, b: usize) -> Self {
        OperatorSpan::Lines {
            first: a.min(b),
            last: a.max(b),
        }
    }

    /// First and last line touched.
    pub fn line_bounds(&self) -> (usize, usize) {
        match *self {
            OperatorSpan::Chars(range) => (range.start.line, range.end.line),
            OperatorSpan::Lines { first, last } => (first, last),
        }
    }
}

/// What the engine has to do after an operator ran.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperatorOutcome {
    /// New cursor position, if the operator moves it.
    pub cursor: Option<Position>,
    /// The operator leaves the editor in INSERT mode (`c`).
    pub enter_insert: bool,
    /// Feedback for the status line.
    pub message: Option<String>,
}

/// Applies operators against a host, writing to the register store.
pub struct OperatorExecutor<'a> {
    registers: &'a mut RegisterStore,
    config: &'a VimConfig,
}

impl<'a> OperatorExecutor<'a> {
    pub fn new(registers: &'a mut RegisterStore, config: &'a VimConfig) -> Self {
        Self { registers, config }
    }

    /// Apply `operator` over `span`, using `register` (or the default).
    pub fn apply<H: TextHost + ?Sized>(
        &mut self,
        host: &mut H,
        operator: Operator,
        span: OperatorSpan,
        register: Option<char>,
    ) -> OperatorOutcome {
        match (operator, span) {
            (Operator::Delete | Operator::Change, OperatorSpan::Chars(range)) => {
                if !range.is_empty() {
                    let text = host.text_in_range(range);
                    self.registers
                        .store(register, Register::charwise(text), RegisterWrite::Delete);
                    host.edit(range, "");
                }
                OperatorOutcome {
                    cursor: Some(range.start),
                    enter_insert: operator == Operator::Change,
                    message: None,
                }
            }
            (Operator::Delete, OperatorSpan::Lines { first, last }) => {
                let text = lines_text(host, first, last);
                self.registers
                    .store(register, Register::linewise(text), RegisterWrite::Delete);
                host.edit(line_deletion_range(host, first, last), "");
                let line = first.min(host.line_count());
                OperatorOutcome {
                    cursor: Some(Position::new(line, host.first_non_blank(line))),
                    ..Default::default()
                }
            }
            (Operator::Change, OperatorSpan::Lines { first, last }) => {
                let text = lines_text(host, first, last);
                self.registers
                    .store(register, Register::linewise(text), RegisterWrite::Delete);
                let end = Position::new(last, host.line_len(last) + 1);
                host.edit(Range::new(Position::new(first, 1), end), "");
                OperatorOutcome {
                    cursor: Some(Position::new(first, 1)),
                    enter_insert: true,
                    message: None,
                }
            }
            (Operator::Yank, OperatorSpan::Chars(range)) => {
                let text = host.text_in_range(range);
                self.registers
                    .store(register, Register::charwise(text), RegisterWrite::Yank);
                OperatorOutcome {
                    message: Some("Yanked".to_string()),
                    ..Default::default()
                }
            }
            (Operator::Yank, OperatorSpan::Lines { first, last }) => {
                let text = lines_text(host, first, last);
                self.registers
                    .store(register, Register::linewise(text), RegisterWrite::Yank);
                let count = last - first + 1;
                let message = if count == 1 {
                    "Yanked".to_string()
                } else {
                    format!("{} lines yanked", count)
                };
                OperatorOutcome {
                    message: Some(message),
                    ..Default::default()
                }
            }
            (Operator::Indent | Operator::Dedent, span) => {
                let (first, last) = span.line_bounds();
                let unit = self.config.indent_unit();
                let width = self.config.tab_width;
                rewrite_lines(host, first, last, |line| {
                    if operator == Operator::Indent {
                        if line.is_empty() {
                            line.to_string()
                        } else {
                            format!("{}{}", unit, line)
                        }
                    } else {
                        dedent(line, width)
                    }
                });
                OperatorOutcome::default()
            }
            (Operator::Lowercase | Operator::Uppercase | Operator::ToggleCase, span) => {
                match span {
                    OperatorSpan::Chars(range) => {
                        let text = host.text_in_range(range);
                        let changed = transform_case(&text, operator);
                        if changed != text {
                            host.edit(range, &changed);
                        }
                        OperatorOutcome {
                            cursor: Some(range.start),
                            ..Default::default()
                        }
                    }
                    OperatorSpan::Lines { first, last } => {
                        rewrite_lines(host, first, last, |line| transform_case(line, operator));
                        OperatorOutcome::default()
                    }
                }
            }
        }
    }
}

/// Lines `first..=last` as register text: joined by `\n`, with a trailing `\n`.
fn lines_text<H: TextHost + ?Sized>(host: &H, first: usize, last: usize) -> String {
    let mut text = String::new();
    for line in first..=last {
        text.push_str(&host.line(line));
        text.push('\n');
    }
    text
}

/// The range that removes lines `first..=last` including one line break.
fn line_deletion_range<H: TextHost + ?Sized>(host: &H, first: usize, last: usize) -> Range {
    let count = host.line_count();
    if last < count {
        Range::new(Position::new(first, 1), Position::new(last + 1, 1))
    } else if first > 1 {
        Range::new(
            Position::new(first - 1, host.line_len(first - 1) + 1),
            Position::new(last, host.line_len(last) + 1),
        )
    } else {
        // Whole buffer: one empty line remains.
        Range::new(Position::origin(), Position::new(last, host.line_len(last) + 1))
    }
}

/// Replace lines `first..=last` with `f(line)` in a single edit.
fn rewrite_lines<H, F>(host: &mut H, first: usize, last: usize, f: F)
where
    H: TextHost + ?Sized,
    F: Fn(&str) -> String,
{
    let last = last.min(host.line_count());
    let old: Vec<String> = (first..=last).map(|n| host.line(n)).collect();
    let new: Vec<String> = old.iter().map(|line| f(line)).collect();
    if new == old {
        return;
    }
    let range = Range::new(
        Position::new(first, 1),
        Position::new(last, host.line_len(last) + 1),
    );
    host.edit(range, &new.join("\n"));
}

fn dedent(line: &str, width: usize) -> String {
    if let Some(rest) = line.strip_prefix('\t') {
        return rest.to_string();
    }
    let spaces = line.chars().take(width).take_while(|&c| c == ' ').count();
    line[spaces..].to_string()
}

/// Apply a case operator to `text`.
pub fn transform_case(text: &str, operator: Operator) -> String {
    match operator {
        Operator::Lowercase => text.to_lowercase(),
        Operator::Uppercase => text.to_uppercase(),
        _ => text
            .chars()
            .flat_map(|c| {
                if c.is_uppercase() {
                    c.to_lowercase().collect::<Vec<_>>()
                } else {
                    c.to_uppercase().collect::<Vec<_>>()
                }
            })
            .collect(),
    }
}

// =============================================================================
// Primitives used directly by normal-mode commands
// =============================================================================

/// Paste `register` `count` times after (`p`) or before (`P`) the cursor.
///
/// Returns the new cursor position.
pub fn paste<H: TextHost + ?Sized>(
    host: &mut H,
    register: &Register,
    before: bool,
    count: usize,
) -> Position {
    let cursor = host.clamp(host.cursor(), false);
    let count = count.max(1);

    if register.linewise {
        let body = register.text.strip_suffix('\n').unwrap_or(&register.text);
        let body = vec![body; count].join("\n");
        if before {
            host.edit(Range::empty(Position::new(cursor.line, 1)), &format!("{}\n", body));
            Position::new(cursor.line, host.first_non_blank(cursor.line))
        } else {
            let eol = Position::new(cursor.line, host.line_len(cursor.line) + 1);
            host.edit(Range::empty(eol), &format!("\n{}", body));
            let line = cursor.line + 1;
            Position::new(line, host.first_non_blank(line))
        }
    } else {
        let text = register.text.repeat(count);
        let at = if before || host.line_len(cursor.line) == 0 {
            cursor
        } else {
            cursor.with_column(cursor.column + 1)
        };
        host.edit(Range::empty(at), &text);
        // Cursor on the last pasted character.
        let mut chars = text.chars();
        chars.next_back();
        position_after(at, chars.as_str())
    }
}

/// Replace `count` characters at `pos` with `ch` (`r`). A line break replaces
/// the whole run with one `\n`. Returns the new cursor, or `None` when the
/// line is too short.
pub fn replace_chars<H: TextHost + ?Sized>(
    host: &mut H,
    pos: Position,
    ch: char,
    count: usize,
) -> Option<Position> {
    let count = count.max(1);
    let len = host.line_len(pos.line);
    if len == 0 || pos.column + count - 1 > len {
        return None;
    }
    let range = Range::new(pos, pos.with_column(pos.column + count));
    if ch == '\n' {
        host.edit(range, "\n");
        return Some(Position::new(pos.line + 1, 1));
    }
    host.edit(range, &ch.to_string().repeat(count));
    Some(pos.with_column(pos.column + count - 1))
}

/// Toggle the case of `count` characters at `pos` (`~`) and return the
/// position after them.
pub fn toggle_case_chars<H: TextHost + ?Sized>(host: &mut H, pos: Position, count: usize) -> Position {
    let len = host.line_len(pos.line);
    if len == 0 {
        return pos;
    }
    let end = (pos.column + count.max(1)).min(len + 1);
    let range = Range::new(pos, pos.with_column(end));
    let text = host.text_in_range(range);
    let toggled = transform_case(&text, Operator::ToggleCase);
    if toggled != text {
        host.edit(range, &toggled);
    }
    pos.with_column(end.min(len))
}

/// Join `max(count, 2)` lines starting at `line` with single spaces (`J`).
///
/// Returns the cursor position (at the last join point), or `None` on the
/// last line.
pub fn join_lines<H: TextHost + ?Sized>(host: &mut H, line: usize, count: usize) -> Option<Position> {
    let last = (line + count.max(2) - 1).min(host.line_count());
    if last <= line {
        return None;
    }

    let mut joined = host.line(line);
    let mut join_column = joined.chars().count() + 1;
    for n in line + 1..=last {
        let next = host.line(n);
        let next = next.trim_start();
        if next.is_empty() {
            continue;
        }
        let trimmed_len = joined.trim_end().len();
        joined.truncate(trimmed_len);
        join_column = joined.chars().count() + 1;
        if !joined.is_empty() && !next.starts_with(')') {
            joined.push(' ');
        }
        joined.push_str(next);
    }

    let range = Range::new(
        Position::new(line, 1),
        Position::new(last, host.line_len(last) + 1),
    );
    host.edit(range, &joined);
    Some(Position::new(line, join_column))
}
