//! The interface between the modal engine and the editor widget.
//!
//! The engine never owns text. It reads lines through [`TextBuffer`] and
//! mutates the buffer, cursor and selection through [`TextHost`]. Every
//! mutation is expected to be visible to the next query.

use crossterm::event::KeyCode;

use crate::key::KeyInput;
use crate::position::{Position, Range};
use crate::status::StatusMessage;

/// Read-only, line-addressed access to buffer content.
///
/// Motion and text-object resolution only needs this trait, so they can be
/// computed against any buffer without a live editor.
pub trait TextBuffer {
    // =========================================================================
    // Required
    // =========================================================================

    /// The content of `line` (1-based) without its line break. Out-of-range
    /// lines are empty.
    fn line(&self, line: usize) -> String;

    /// Number of lines. A buffer always has at least one line.
    fn line_count(&self) -> usize;

    // =========================================================================
    // Provided
    // =========================================================================

    /// Length of `line` in characters.
    fn line_len(&self, line: usize) -> usize {
        self.line(line).chars().count()
    }

    /// The character at `pos`, or `None` past the end of the line.
    fn char_at(&self, pos: Position) -> Option<char> {
        if pos.column == 0 {
            return None;
        }
        self.line(pos.line).chars().nth(pos.column - 1)
    }

    /// Column of the first non-whitespace character of `line`. Blank lines
    /// give their last column (or 1 when empty).
    fn first_non_blank(&self, line: usize) -> usize {
        let text = self.line(line);
        text.chars()
            .position(|c| !c.is_whitespace())
            .map(|i| i + 1)
            .unwrap_or_else(|| text.chars().count().max(1))
    }

    /// Clamp a position into the buffer. `column` may reach `len + 1` when
    /// `past_end` is set, otherwise it stops on the last character.
    fn clamp(&self, pos: Position, past_end: bool) -> Position {
        let line = pos.line.clamp(1, self.line_count().max(1));
        let len = self.line_len(line);
        let max_column = if past_end { len + 1 } else { len.max(1) };
        Position::new(line, pos.column.clamp(1, max_column))
    }

    /// Position just past the last character of the buffer.
    fn end_position(&self) -> Position {
        let last = self.line_count().max(1);
        Position::new(last, self.line_len(last) + 1)
    }

    /// The text covered by `range`, with `\n` between lines.
    fn text_in_range(&self, range: Range) -> String {
        let start = self.clamp(range.start, true);
        let end = self.clamp(range.end, true);
        if start >= end {
            return String::new();
        }

        if start.line == end.line {
            return self
                .line(start.line)
                .chars()
                .skip(start.column - 1)
                .take(end.column - start.column)
                .collect();
        }

        let mut out: String = self.line(start.line).chars().skip(start.column - 1).collect();
        for line in start.line + 1..end.line {
            out.push('\n');
            out.push_str(&self.line(line));
        }
        out.push('\n');
        out.extend(self.line(end.line).chars().take(end.column - 1));
        out
    }

    /// The whole buffer joined with `\n`.
    fn full_text(&self) -> String {
        (1..=self.line_count())
            .map(|n| self.line(n))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// An editor the engine can drive.
pub trait TextHost: TextBuffer {
    // =========================================================================
    // Required
    // =========================================================================

    fn cursor(&self) -> Position;

    fn set_cursor(&mut self, pos: Position);

    /// Replace the text in `range` with `text` (which may contain `\n`).
    fn edit(&mut self, range: Range, text: &str);

    /// The current selection. Empty (at the cursor) when nothing is selected.
    fn selection(&self) -> Range;

    fn set_selection(&mut self, range: Range);

    fn undo(&mut self);

    fn redo(&mut self);

    // =========================================================================
    // Provided
    // =========================================================================

    /// Scroll `pos` into view.
    fn reveal_position(&mut self, _pos: Position) {}

    /// First and last visible lines, used by `H`, `M` and `L`.
    fn visible_lines(&self) -> (usize, usize) {
        (1, self.line_count().max(1))
    }

    /// Receive a transient feedback message.
    fn notify(&mut self, _message: &StatusMessage) {}

    /// Insert `text` at the cursor and leave the cursor after it.
    fn insert_at_cursor(&mut self, text: &str) {
        let at = self.clamp(self.cursor(), true);
        self.edit(Range::empty(at), text);
        self.set_cursor(position_after(at, text));
    }

    /// What a plain text area does with a key the engine did not consume.
    ///
    /// Hosts with their own default handling never need to call this; the
    /// engine uses it when it replays keys on its own (macro playback).
    fn apply_default_key(&mut self, key: &KeyInput) {
        let cursor = self.clamp(self.cursor(), true);
        if let Some(c) = key.printable() {
            self.insert_at_cursor(&c.to_string());
            return;
        }
        match key.code {
            KeyCode::Enter => self.insert_at_cursor("\n"),
            KeyCode::Tab if key.ctrl_char().is_none() => self.insert_at_cursor("\t"),
            KeyCode::Backspace => {
                let from = if cursor.column > 1 {
                    cursor.with_column(cursor.column - 1)
                } else if cursor.line > 1 {
                    Position::new(cursor.line - 1, self.line_len(cursor.line - 1) + 1)
                } else {
                    return;
                };
                self.edit(Range::new(from, cursor), "");
                self.set_cursor(from);
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down => {
                let target = match key.code {
                    KeyCode::Left => cursor.with_column(cursor.column.saturating_sub(1)),
                    KeyCode::Right => cursor.with_column(cursor.column + 1),
                    KeyCode::Up => Position::new(cursor.line.saturating_sub(1), cursor.column),
                    _ => Position::new(cursor.line + 1, cursor.column),
                };
                let target = self.clamp(target, true);
                self.set_cursor(target);
            }
            _ => {}
        }
    }
}

/// The position reached after typing `text` starting at `start`.
pub fn position_after(start: Position, text: &str) -> Position {
    match text.rfind('\n') {
        Some(idx) => Position::new(
            start.line + text.matches('\n').count(),
            text[idx + 1..].chars().count() + 1,
        ),
        None => start.with_column(start.column + text.chars().count()),
    }
}
