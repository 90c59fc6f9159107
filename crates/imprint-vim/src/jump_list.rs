//! Bounded history of large cursor moves, walked with Ctrl-O and Ctrl-I.

use std::collections::VecDeque;

use crate::position::Position;

/// Jump history with a cursor into it.
///
/// `index == len` means the cursor is at the live position, past the newest
/// entry. Walking back from there first records the live position so that
/// Ctrl-I can return to it.
#[derive(Debug, Clone)]
pub struct JumpList {
    entries: VecDeque<Position>,
    index: usize,
    capacity: usize,
}

impl Default for JumpList {
    fn default() -> Self {
        Self::with_capacity(100)
    }
}

impl JumpList {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            index: 0,
            capacity: capacity.max(1),
        }
    }

    /// Record the position a jump starts from.
    pub fn push(&mut self, pos: Position) {
        if self.index < self.entries.len() {
            self.entries.truncate(self.index + 1);
        }
        if self.entries.back() != Some(&pos) {
            self.entries.push_back(pos);
        }
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.index = self.entries.len();
    }

    /// Step back from `current`. Returns `None` at the oldest entry.
    pub fn back(&mut self, current: Position) -> Option<Position> {
        if self.index >= self.entries.len() {
            if self.entries.back() != Some(&current) {
                self.entries.push_back(current);
                if self.entries.len() > self.capacity {
                    self.entries.pop_front();
                }
            }
            self.index = self.entries.len() - 1;
        }
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        self.entries.get(self.index).copied()
    }

    /// Step forward. Returns `None` at the newest entry.
    pub fn forward(&mut self) -> Option<Position> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        self.entries.get(self.index).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = 0;
    }
}
