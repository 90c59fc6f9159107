//! An in-memory [`TextHost`].
//!
//! Keeps lines in a `Vec<String>` with snapshot undo/redo. Useful for tests
//! and for embedders that drive the engine without a text widget.

use crate::host::{TextBuffer, TextHost};
use crate::position::{Position, Range};
use crate::status::StatusMessage;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Snapshot {
    lines: Vec<String>,
    cursor: Position,
}

#[derive(Debug, Clone)]
pub struct MemoryHost {
    lines: Vec<String>,
    cursor: Position,
    selection: Range,
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    viewport: Option<(usize, usize)>,
    messages: Vec<StatusMessage>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new("")
    }
}

impl MemoryHost {
    /// Create a host holding `text`, cursor at 1:1.
    pub fn new(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(str::to_string).collect(),
            cursor: Position::origin(),
            selection: Range::empty(Position::origin()),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            viewport: None,
            messages: Vec::new(),
        }
    }

    /// The buffer joined with `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Limit the visible range reported to `H`, `M` and `L`.
    pub fn set_viewport(&mut self, first: usize, last: usize) {
        self.viewport = Some((first, last));
    }

    /// Every message the engine has sent, oldest first.
    pub fn messages(&self) -> &[StatusMessage] {
        &self.messages
    }

    pub fn last_message(&self) -> Option<&StatusMessage> {
        self.messages.last()
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            lines: self.lines.clone(),
            cursor: self.cursor,
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.lines = snapshot.lines;
        self.cursor = self.clamp(snapshot.cursor, false);
        self.selection = Range::empty(self.cursor);
    }
}

impl TextBuffer for MemoryHost {
    fn line(&self, line: usize) -> String {
        line.checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .cloned()
            .unwrap_or_default()
    }

    fn line_count(&self) -> usize {
        self.lines.len().max(1)
    }
}

impl TextHost for MemoryHost {
    fn cursor(&self) -> Position {
        self.cursor
    }

    fn set_cursor(&mut self, pos: Position) {
        self.cursor = self.clamp(pos, true);
    }

    fn edit(&mut self, range: Range, text: &str) {
        let start = self.clamp(range.start, true);
        let end = self.clamp(range.end, true);
        let snapshot = self.snapshot();
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();

        let first = self.line(start.line);
        let last = self.line(end.line);
        let mut joined: String = first.chars().take(start.column - 1).collect();
        joined.push_str(text);
        joined.extend(last.chars().skip(end.column - 1));

        let replacement: Vec<String> = joined.split('\n').map(str::to_string).collect();
        self.lines.splice(start.line - 1..end.line, replacement);
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.cursor = self.clamp(self.cursor, true);
    }

    fn selection(&self) -> Range {
        self.selection
    }

    fn set_selection(&mut self, range: Range) {
        self.selection = range;
    }

    fn undo(&mut self) {
        if let Some(snapshot) = self.undo_stack.pop() {
            let current = self.snapshot();
            self.redo_stack.push(current);
            self.restore(snapshot);
        }
    }

    fn redo(&mut self) {
        if let Some(snapshot) = self.redo_stack.pop() {
            let current = self.snapshot();
            self.undo_stack.push(current);
            self.restore(snapshot);
        }
    }

    fn visible_lines(&self) -> (usize, usize) {
        self.viewport.unwrap_or((1, self.line_count()))
    }

    fn notify(&mut self, message: &StatusMessage) {
        self.messages.push(message.clone());
    }
}
