//! Command tokens produced by the key handler.
//!
//! Key handling is split in two phases: [`crate::key_handler`] lexes raw keys
//! (counts, operators, pending characters, `g` prefix) into a [`VimCommand`],
//! and [`crate::engine::VimEngine`] interprets the command against a host.

use crate::error::VimError;
use crate::motion::Motion;
use crate::operator::Operator;
use crate::text_object::{TextObject, TextObjectModifier};

/// Where `i`, `a`, `I`, `A`, `o` and `O` start inserting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertKind {
    /// At the cursor (`i`).
    Before,
    /// After the cursor (`a`).
    After,
    /// At the first non-blank (`I`).
    LineStart,
    /// At the end of the line (`A`).
    LineEnd,
    /// On a new line below (`o`).
    OpenBelow,
    /// On a new line above (`O`).
    OpenAbove,
}

impl InsertKind {
    pub fn from_key(c: char) -> Option<Self> {
        match c {
            'i' => Some(InsertKind::Before),
            'a' => Some(InsertKind::After),
            'I' => Some(InsertKind::LineStart),
            'A' => Some(InsertKind::LineEnd),
            'o' => Some(InsertKind::OpenBelow),
            'O' => Some(InsertKind::OpenAbove),
            _ => None,
        }
    }

    /// Opening a line: repeated text goes on new lines too.
    pub fn opens_line(&self) -> bool {
        matches!(self, InsertKind::OpenBelow | InsertKind::OpenAbove)
    }
}

/// A command ready to be executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VimCommand {
    // Movement
    /// Move the cursor (or extend the visual selection).
    Move(Motion),

    // Operators
    /// Operator over the range from the cursor to a motion target.
    OperatorMotion { operator: Operator, motion: Motion },
    /// Operator over a text object.
    OperatorTextObject {
        operator: Operator,
        object: TextObject,
        modifier: TextObjectModifier,
    },
    /// Doubled operator over `count` whole lines (`dd`, `3yy`, `>>`).
    OperatorLines { operator: Operator, count: usize },

    // Mode changes
    /// Enter insert mode.
    Insert { kind: InsertKind, count: usize },
    /// Enter (or toggle) visual mode.
    EnterVisual { linewise: bool },
    /// Enter replace mode (`R`).
    EnterReplace,
    /// Open the command line with `:`, `/` or `?`.
    EnterCommandLine(char),
    /// Escape from normal or visual mode.
    ExitToNormal,

    // Visual mode
    /// Swap anchor and cursor (`o`).
    VisualSwapEnds,
    /// Apply an operator to the selection.
    VisualOperator(Operator),
    /// Select a text object.
    VisualTextObject {
        object: TextObject,
        modifier: TextObjectModifier,
    },

    // Editing
    /// Paste after (`p`) or before (`P`).
    Paste { before: bool, count: usize },
    /// Replace characters under the cursor (`r`).
    ReplaceChar { ch: char, count: usize },
    /// Toggle case and advance (`~`).
    ToggleCase { count: usize },
    /// Join lines (`J`).
    JoinLines { count: usize },
    /// Repeat the last change (`.`); a count replaces the recorded one.
    RepeatLastEdit { count: Option<usize> },
    Undo { count: usize },
    Redo { count: usize },

    // Search and marks
    /// Search the word under the cursor (`*`, `#`).
    SearchWord { forward: bool, count: usize },
    /// Set a mark (`m`).
    SetMark(char),

    // Macros
    StartRecording(char),
    StopRecording,
    PlayMacro { name: char, count: usize },

    // Jump list
    JumpBack { count: usize },
    JumpForward { count: usize },

    // Insert, replace and command-line modes
    /// Escape from insert or replace mode.
    ExitInsert,
    /// Overwrite the character under the cursor (replace mode).
    Overwrite(char),
    CommandLineInput(char),
    CommandLineBackspace,
    CommandLineExecute,
    CommandLineCancel,

    /// The keys formed a command that cannot run; report the error.
    Fail(VimError),
}

impl VimCommand {
    /// Returns true if this command can change the buffer.
    pub fn is_mutating(&self) -> bool {
        match self {
            VimCommand::OperatorMotion { operator, .. }
            | VimCommand::OperatorTextObject { operator, .. }
            | VimCommand::OperatorLines { operator, .. }
            | VimCommand::VisualOperator(operator) => operator.is_mutating(),
            VimCommand::Insert { .. }
            | VimCommand::EnterReplace
            | VimCommand::Paste { .. }
            | VimCommand::ReplaceChar { .. }
            | VimCommand::ToggleCase { .. }
            | VimCommand::JoinLines { .. }
            | VimCommand::RepeatLastEdit { .. }
            | VimCommand::Undo { .. }
            | VimCommand::Redo { .. }
            | VimCommand::Overwrite(_) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_kind_from_key() {
        assert_eq!(InsertKind::from_key('A'), Some(InsertKind::LineEnd));
        assert_eq!(InsertKind::from_key('x'), None);
        assert!(InsertKind::OpenAbove.opens_line());
        assert!(!InsertKind::After.opens_line());
    }

    #[test]
    fn test_is_mutating() {
        let yank = VimCommand::OperatorLines {
            operator: Operator::Yank,
            count: 1,
        };
        assert!(!yank.is_mutating());
        let delete = VimCommand::OperatorMotion {
            operator: Operator::Delete,
            motion: Motion::WordForward(1),
        };
        assert!(delete.is_mutating());
        assert!(!VimCommand::Move(Motion::Left(1)).is_mutating());
    }
}
