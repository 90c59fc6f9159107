//! Modal editing state owned by the engine for one editing session.

use crate::command::InsertKind;
use crate::config::VimConfig;
use crate::jump_list::JumpList;
use crate::macros::MacroStore;
use crate::marks::MarkStore;
use crate::mode::VimMode;
use crate::motion::{CharSearch, FindKind, Motion};
use crate::operator::Operator;
use crate::position::Position;
use crate::registers::RegisterStore;
use crate::search::LastSearch;
use crate::text_object::{TextObject, TextObjectModifier};

/// Largest count a digit prefix can build.
pub const MAX_COUNT: usize = 99_999;

/// An operator waiting for its motion or text object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingOperator {
    pub operator: Operator,
    /// Count typed before the operator (`3` in `3dw`).
    pub count: Option<usize>,
}

/// A command waiting for one more raw character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingChar {
    /// `"` awaiting a register name.
    Register,
    /// `r` awaiting the replacement.
    Replace,
    /// `f`, `F`, `t`, `T` awaiting the target.
    Find { kind: FindKind, forward: bool },
    /// `m` awaiting a mark name.
    SetMark,
    /// `'` or `` ` `` awaiting a mark name.
    JumpMark { linewise: bool },
    /// `@` awaiting a macro name.
    PlayMacro,
    /// `q` awaiting a macro name.
    Record,
    /// `i` or `a` awaiting a text object.
    TextObject(TextObjectModifier),
}

/// The region a repeated operator acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    Motion(Motion),
    TextObject(TextObject, TextObjectModifier),
    /// `count` whole lines from the cursor.
    Lines(usize),
    /// A characterwise visual span, replayed from the cursor: on one line it
    /// covers `columns` characters, otherwise it ends `line_delta` lines down
    /// at column `columns`.
    Chars { line_delta: usize, columns: usize },
}

/// The kind of change `.` repeats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditAction {
    Insert(InsertKind),
    Operator { operator: Operator, target: EditTarget },
    Paste { before: bool, register: Option<char> },
    ReplaceChars(char),
    ToggleCase,
    JoinLines,
    /// Replace mode; the overwritten text is in `inserted`.
    Overwrite,
}

/// The most recent change, recorded by effect rather than by keystroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastEdit {
    pub action: EditAction,
    pub count: usize,
    /// Text typed in insert or replace mode as part of this change.
    pub inserted: String,
    /// Still capturing typed text (insert mode not yet left).
    pub recording: bool,
}

impl LastEdit {
    pub fn new(action: EditAction, count: usize) -> Self {
        Self {
            action,
            count,
            inserted: String::new(),
            recording: false,
        }
    }

    /// A change that continues in insert mode and captures typed text.
    pub fn capturing(action: EditAction, count: usize) -> Self {
        Self {
            recording: true,
            ..Self::new(action, count)
        }
    }
}

/// All modal state. Created when modal editing is enabled and reset to
/// these initial values when it is disabled.
#[derive(Debug, Clone)]
pub struct VimState {
    pub(crate) mode: VimMode,
    pub(crate) pending_operator: Option<PendingOperator>,
    pub(crate) pending_char: Option<PendingChar>,
    /// `g` typed, awaiting the second key.
    pub(crate) g_prefix: bool,
    /// Digits typed so far.
    pub(crate) count: String,
    /// Register chosen with `"x` for the next yank, delete or paste.
    pub(crate) selected_register: Option<char>,
    pub(crate) registers: RegisterStore,
    pub(crate) marks: MarkStore,
    pub(crate) macros: MacroStore,
    pub(crate) jump_list: JumpList,
    pub(crate) last_search: Option<LastSearch>,
    pub(crate) last_find: Option<CharSearch>,
    pub(crate) visual_anchor: Option<Position>,
    /// Unclamped target of the last visual motion. It can lie one past the
    /// end of a line, where the cursor cannot.
    pub(crate) visual_head: Option<Position>,
    /// The last visual motion was inclusive; the selection covers its target.
    pub(crate) visual_inclusive: bool,
    pub(crate) last_edit: Option<LastEdit>,
    /// Command line including its `:`, `/` or `?` prefix.
    pub(crate) command_line: String,
    /// Keys of the incomplete command, for the status line.
    pub(crate) pending_keys: String,
}

impl VimState {
    pub fn new(config: &VimConfig) -> Self {
        Self {
            mode: VimMode::Normal,
            pending_operator: None,
            pending_char: None,
            g_prefix: false,
            count: String::new(),
            selected_register: None,
            registers: RegisterStore::new(),
            marks: MarkStore::new(),
            macros: MacroStore::new(),
            jump_list: JumpList::with_capacity(config.jump_list_capacity),
            last_search: None,
            last_find: None,
            visual_anchor: None,
            visual_head: None,
            visual_inclusive: false,
            last_edit: None,
            command_line: String::new(),
            pending_keys: String::new(),
        }
    }

    pub fn mode(&self) -> VimMode {
        self.mode
    }

    pub fn registers(&self) -> &RegisterStore {
        &self.registers
    }

    pub fn marks(&self) -> &MarkStore {
        &self.marks
    }

    pub fn macros(&self) -> &MacroStore {
        &self.macros
    }

    pub fn jump_list(&self) -> &JumpList {
        &self.jump_list
    }

    pub fn last_search(&self) -> Option<&LastSearch> {
        self.last_search.as_ref()
    }

    pub fn last_edit(&self) -> Option<&LastEdit> {
        self.last_edit.as_ref()
    }

    pub fn pending_operator(&self) -> Option<PendingOperator> {
        self.pending_operator
    }

    pub fn pending_char(&self) -> Option<PendingChar> {
        self.pending_char
    }

    /// Returns true while an operator, pending character, `g` prefix, count or
    /// register selection is incomplete.
    pub fn has_pending(&self) -> bool {
        self.pending_operator.is_some()
            || self.pending_char.is_some()
            || self.g_prefix
            || !self.count.is_empty()
            || self.selected_register.is_some()
    }

    /// Add a digit to the count, saturating at [`MAX_COUNT`].
    pub(crate) fn push_count_digit(&mut self, digit: char) {
        self.count.push(digit);
        if self.count.parse::<usize>().map_or(true, |n| n > MAX_COUNT) {
            self.count = MAX_COUNT.to_string();
        }
    }

    /// Consume the typed count, if any.
    pub(crate) fn take_count(&mut self) -> Option<usize> {
        let count = self.count.parse::<usize>().ok().filter(|&n| n > 0);
        self.count.clear();
        count
    }

    /// Drop every half-typed command (Escape).
    pub(crate) fn clear_pending(&mut self) {
        self.pending_operator = None;
        self.pending_char = None;
        self.g_prefix = false;
        self.count.clear();
        self.selected_register = None;
        self.pending_keys.clear();
    }
}

impl Default for VimState {
    fn default() -> Self {
        Self::new(&VimConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = VimState::default();
        assert_eq!(state.mode(), VimMode::Normal);
        assert!(!state.has_pending());
        assert!(state.registers().get('"').is_some());
        assert!(state.last_edit().is_none());
    }

    #[test]
    fn test_count_accumulates_and_resets() {
        let mut state = VimState::default();
        state.push_count_digit('1');
        state.push_count_digit('2');
        assert!(state.has_pending());
        assert_eq!(state.take_count(), Some(12));
        assert_eq!(state.take_count(), None);
        assert!(state.count.is_empty());
    }

    #[test]
    fn test_count_is_capped() {
        let mut state = VimState::default();
        for _ in 0..12 {
            state.push_count_digit('9');
        }
        assert_eq!(state.take_count(), Some(MAX_COUNT));
    }

    #[test]
    fn test_clear_pending() {
        let mut state = VimState::default();
        state.pending_operator = Some(PendingOperator {
            operator: Operator::Delete,
            count: Some(2),
        });
        state.pending_char = Some(PendingChar::Register);
        state.push_count_digit('3');
        state.clear_pending();
        assert!(!state.has_pending());
    }

    #[test]
    fn test_capturing_edit() {
        let edit = LastEdit::capturing(EditAction::Insert(InsertKind::Before), 2);
        assert!(edit.recording);
        assert_eq!(edit.count, 2);
        assert!(edit.inserted.is_empty());
    }
}
