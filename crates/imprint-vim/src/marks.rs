//! Named positions set with `m{a-z}` and jumped to with `'` or `` ` ``.

use std::collections::HashMap;

use crate::position::Position;

#[derive(Debug, Clone, Default)]
pub struct MarkStore {
    marks: HashMap<char, Position>,
    /// Position before the latest jump, read by `''` and ``` `` ```.
    previous: Option<Position>,
}

impl MarkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_settable(name: char) -> bool {
        name.is_ascii_alphabetic()
    }

    /// Set a letter mark. Returns false for names that cannot be set.
    pub fn set(&mut self, name: char, pos: Position) -> bool {
        if !Self::is_settable(name) {
            return false;
        }
        self.marks.insert(name, pos);
        true
    }

    pub fn get(&self, name: char) -> Option<Position> {
        match name {
            '\'' | '`' => self.previous,
            _ => self.marks.get(&name).copied(),
        }
    }

    pub fn set_previous(&mut self, pos: Position) {
        self.previous = Some(pos);
    }

    pub fn clear(&mut self) {
        self.marks.clear();
        self.previous = None;
    }
}
