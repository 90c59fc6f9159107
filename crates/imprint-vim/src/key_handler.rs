//! Key-to-command translation for vim modal editing.
//!
//! This is the first phase of dispatch. It tracks counts, pending operators,
//! pending single-character commands and the `g` prefix in [`VimState`], and
//! produces a [`VimCommand`] once a command is complete. It never touches the
//! buffer.

use crossterm::event::KeyCode;

use crate::command::{InsertKind, VimCommand};
use crate::error::VimError;
use crate::key::KeyInput;
use crate::macros::MacroStore;
use crate::marks::MarkStore;
use crate::mode::VimMode;
use crate::motion::{CharSearch, FindKind, Motion};
use crate::operator::Operator;
use crate::registers::RegisterStore;
use crate::state::{MAX_COUNT, PendingChar, PendingOperator, VimState};
use crate::text_object::{TextObject, TextObjectModifier};

/// Result of handling a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyResult {
    /// A command was produced.
    Command(VimCommand),
    /// The key was consumed and more keys are needed (count, operator, `g`).
    Pending,
    /// The key should be handled by the host as ordinary input.
    PassThrough,
    /// The key was consumed but produced nothing (cancelled or unmapped).
    Consumed,
}

impl VimState {
    /// Translate one key press in the current mode.
    pub fn lex_key(&mut self, key: &KeyInput) -> KeyResult {
        match self.mode {
            VimMode::Insert => self.lex_insert_key(key),
            VimMode::Replace => self.lex_replace_key(key),
            VimMode::Command => self.lex_command_line_key(key),
            VimMode::Normal | VimMode::Visual | VimMode::VisualLine => {
                let result = self.lex_normal_key(key);
                if result == KeyResult::Pending {
                    self.pending_keys.push_str(&key.to_string());
                } else {
                    self.pending_keys.clear();
                }
                result
            }
        }
    }

    fn lex_insert_key(&mut self, key: &KeyInput) -> KeyResult {
        if key.is_escape() {
            KeyResult::Command(VimCommand::ExitInsert)
        } else {
            KeyResult::PassThrough
        }
    }

    fn lex_replace_key(&mut self, key: &KeyInput) -> KeyResult {
        if key.is_escape() {
            return KeyResult::Command(VimCommand::ExitInsert);
        }
        match key.printable() {
            Some(c) => KeyResult::Command(VimCommand::Overwrite(c)),
            None => KeyResult::PassThrough,
        }
    }

    fn lex_command_line_key(&mut self, key: &KeyInput) -> KeyResult {
        if key.is_escape() {
            return KeyResult::Command(VimCommand::CommandLineCancel);
        }
        if key.is_enter() {
            return KeyResult::Command(VimCommand::CommandLineExecute);
        }
        if key.is_backspace() {
            return KeyResult::Command(VimCommand::CommandLineBackspace);
        }
        match key.printable() {
            Some(c) => KeyResult::Command(VimCommand::CommandLineInput(c)),
            None => KeyResult::Consumed,
        }
    }

    fn lex_normal_key(&mut self, key: &KeyInput) -> KeyResult {
        if key.is_escape() {
            self.clear_pending();
            return KeyResult::Command(VimCommand::ExitToNormal);
        }

        if let Some(pending) = self.pending_char.take() {
            return self.lex_pending_char(pending, key);
        }

        if let Some(c) = key.ctrl_char() {
            let count = self.take_count().unwrap_or(1);
            self.clear_pending();
            return match c {
                'o' => KeyResult::Command(VimCommand::JumpBack { count }),
                'i' => KeyResult::Command(VimCommand::JumpForward { count }),
                'r' => KeyResult::Command(VimCommand::Redo { count }),
                _ => KeyResult::PassThrough,
            };
        }

        let c = match key.code {
            KeyCode::Char(c) if key.printable().is_some() => c,
            KeyCode::Backspace => 'h',
            KeyCode::Enter => 'j',
            KeyCode::Delete => 'x',
            KeyCode::Home => '0',
            KeyCode::End => '$',
            KeyCode::Tab => {
                let count = self.take_count().unwrap_or(1);
                self.clear_pending();
                return KeyResult::Command(VimCommand::JumpForward { count });
            }
            _ => {
                self.clear_pending();
                return KeyResult::PassThrough;
            }
        };

        if self.g_prefix {
            self.g_prefix = false;
            return self.lex_g_key(c);
        }

        if c.is_ascii_digit() && (c != '0' || !self.count.is_empty()) {
            self.push_count_digit(c);
            return KeyResult::Pending;
        }

        if c == '"' && self.pending_operator.is_none() {
            self.pending_char = Some(PendingChar::Register);
            return KeyResult::Pending;
        }

        if let Some(pending) = self.pending_operator {
            return self.lex_operator_key(pending, c);
        }

        // Keys that wait for another character keep the count for later.
        if let Some(pending) = self.pending_char_for(c) {
            self.pending_char = Some(pending);
            return KeyResult::Pending;
        }

        if self.mode.is_visual() {
            self.lex_visual_key(c)
        } else {
            self.lex_normal_char(c)
        }
    }

    /// Keys that start a pending single-character command in normal or
    /// visual mode.
    fn pending_char_for(&self, c: char) -> Option<PendingChar> {
        let visual = self.mode.is_visual();
        let pending = match c {
            'f' => PendingChar::Find {
                kind: FindKind::Find,
                forward: true,
            },
            'F' => PendingChar::Find {
                kind: FindKind::Find,
                forward: false,
            },
            't' => PendingChar::Find {
                kind: FindKind::Till,
                forward: true,
            },
            'T' => PendingChar::Find {
                kind: FindKind::Till,
                forward: false,
            },
            '\'' => PendingChar::JumpMark { linewise: true },
            '`' => PendingChar::JumpMark { linewise: false },
            'i' if visual => PendingChar::TextObject(TextObjectModifier::Inner),
            'a' if visual => PendingChar::TextObject(TextObjectModifier::Around),
            'm' if !visual => PendingChar::SetMark,
            'r' if !visual => PendingChar::Replace,
            '@' if !visual => PendingChar::PlayMacro,
            'q' if !visual && !self.macros.is_recording() => PendingChar::Record,
            _ => return None,
        };
        Some(pending)
    }

    /// Handle a key after an operator (d, c, y, >, <, gu, gU, g~).
    fn lex_operator_key(&mut self, pending: PendingOperator, c: char) -> KeyResult {
        if c == pending.operator.doubled_key() {
            let count = self.motion_count().unwrap_or(1);
            self.pending_operator = None;
            return KeyResult::Command(VimCommand::OperatorLines {
                operator: pending.operator,
                count,
            });
        }

        let waits = match c {
            'i' => Some(PendingChar::TextObject(TextObjectModifier::Inner)),
            'a' => Some(PendingChar::TextObject(TextObjectModifier::Around)),
            'g' => {
                self.g_prefix = true;
                return KeyResult::Pending;
            }
            _ => self.pending_char_for(c).filter(|p| {
                matches!(p, PendingChar::Find { .. } | PendingChar::JumpMark { .. })
            }),
        };
        if let Some(waits) = waits {
            self.pending_char = Some(waits);
            return KeyResult::Pending;
        }

        let count = self.motion_count();
        match self.key_motion(c, count) {
            Ok(Some(motion)) => self.finish_motion(motion),
            Ok(None) => {
                self.clear_pending();
                KeyResult::Consumed
            }
            Err(err) => {
                self.clear_pending();
                KeyResult::Command(VimCommand::Fail(err))
            }
        }
    }

    /// Handle the key after `g`.
    fn lex_g_key(&mut self, c: char) -> KeyResult {
        if let Some(operator) = Operator::from_g_key(c) {
            return match self.pending_operator {
                Some(p) if p.operator == operator => {
                    let count = self.motion_count().unwrap_or(1);
                    self.pending_operator = None;
                    KeyResult::Command(VimCommand::OperatorLines { operator, count })
                }
                Some(_) => {
                    self.clear_pending();
                    KeyResult::Consumed
                }
                None if self.mode.is_visual() => {
                    self.count.clear();
                    KeyResult::Command(VimCommand::VisualOperator(operator))
                }
                None => {
                    let count = self.take_count();
                    self.pending_operator = Some(PendingOperator { operator, count });
                    KeyResult::Pending
                }
            };
        }

        let count = self.motion_count();
        let motion = match c {
            'g' => Motion::DocumentStart(count),
            'e' | 'E' => Motion::WordEndBackward(count.unwrap_or(1)),
            _ => {
                self.clear_pending();
                return KeyResult::Consumed;
            }
        };
        self.finish_motion(motion)
    }

    fn lex_pending_char(&mut self, pending: PendingChar, key: &KeyInput) -> KeyResult {
        let c = match (pending, key.printable()) {
            (_, Some(c)) => c,
            (PendingChar::Replace, None) if key.is_enter() => '\n',
            _ => {
                self.clear_pending();
                return KeyResult::Consumed;
            }
        };

        match pending {
            PendingChar::Register => {
                if RegisterStore::is_valid_name(c) {
                    self.selected_register = Some(c);
                    KeyResult::Pending
                } else {
                    self.clear_pending();
                    KeyResult::Consumed
                }
            }
            PendingChar::Replace => {
                let count = self.take_count().unwrap_or(1);
                KeyResult::Command(VimCommand::ReplaceChar { ch: c, count })
            }
            PendingChar::Find { kind, forward } => {
                let search = CharSearch {
                    ch: c,
                    kind,
                    forward,
                };
                self.last_find = Some(search);
                let count = self.motion_count().unwrap_or(1);
                self.finish_motion(Motion::FindChar {
                    search,
                    count,
                    repeat: false,
                })
            }
            PendingChar::SetMark => {
                self.count.clear();
                if MarkStore::is_settable(c) {
                    KeyResult::Command(VimCommand::SetMark(c))
                } else {
                    KeyResult::Consumed
                }
            }
            PendingChar::JumpMark { linewise } => {
                self.motion_count();
                self.finish_motion(Motion::Mark { name: c, linewise })
            }
            PendingChar::PlayMacro => {
                let count = self.take_count().unwrap_or(1);
                let name = if c == '@' {
                    match self.macros.last_played() {
                        Some(name) => name,
                        None => return KeyResult::Command(VimCommand::Fail(VimError::EmptyMacro('@'))),
                    }
                } else {
                    c
                };
                if MacroStore::is_valid_name(name) {
                    KeyResult::Command(VimCommand::PlayMacro { name, count })
                } else {
                    KeyResult::Consumed
                }
            }
            PendingChar::Record => {
                self.count.clear();
                if MacroStore::is_valid_name(c) {
                    KeyResult::Command(VimCommand::StartRecording(c))
                } else {
                    KeyResult::Consumed
                }
            }
            PendingChar::TextObject(modifier) => {
                self.count.clear();
                let Some(object) = TextObject::from_char(c) else {
                    self.clear_pending();
                    return KeyResult::Consumed;
                };
                match self.pending_operator.take() {
                    Some(p) => KeyResult::Command(VimCommand::OperatorTextObject {
                        operator: p.operator,
                        object,
                        modifier,
                    }),
                    None if self.mode.is_visual() => {
                        KeyResult::Command(VimCommand::VisualTextObject { object, modifier })
                    }
                    None => KeyResult::Consumed,
                }
            }
        }
    }

    fn lex_normal_char(&mut self, c: char) -> KeyResult {
        if let Some(operator) = Operator::from_key(c) {
            let count = self.take_count();
            self.pending_operator = Some(PendingOperator { operator, count });
            return KeyResult::Pending;
        }
        if c == 'g' {
            self.g_prefix = true;
            return KeyResult::Pending;
        }
        if c == '.' {
            let count = self.take_count();
            return KeyResult::Command(VimCommand::RepeatLastEdit { count });
        }

        let typed = self.take_count();
        let count = typed.unwrap_or(1);
        let command = match c {
            'q' => VimCommand::StopRecording,
            'v' => VimCommand::EnterVisual { linewise: false },
            'V' => VimCommand::EnterVisual { linewise: true },
            'R' => VimCommand::EnterReplace,
            ':' | '/' | '?' => VimCommand::EnterCommandLine(c),
            'x' => delete_motion(Motion::Right(count)),
            'X' => delete_motion(Motion::Left(count)),
            'D' => delete_motion(Motion::LineEnd(count)),
            'C' => VimCommand::OperatorMotion {
                operator: Operator::Change,
                motion: Motion::LineEnd(count),
            },
            's' => VimCommand::OperatorMotion {
                operator: Operator::Change,
                motion: Motion::Right(count),
            },
            'S' => VimCommand::OperatorLines {
                operator: Operator::Change,
                count,
            },
            'Y' => VimCommand::OperatorLines {
                operator: Operator::Yank,
                count,
            },
            'p' => VimCommand::Paste {
                before: false,
                count,
            },
            'P' => VimCommand::Paste {
                before: true,
                count,
            },
            '~' => VimCommand::ToggleCase { count },
            'J' => VimCommand::JoinLines { count },
            'u' => VimCommand::Undo { count },
            '*' => VimCommand::SearchWord {
                forward: true,
                count,
            },
            '#' => VimCommand::SearchWord {
                forward: false,
                count,
            },
            _ => {
                if let Some(kind) = InsertKind::from_key(c) {
                    VimCommand::Insert { kind, count }
                } else {
                    return self.motion_result(c, typed);
                }
            }
        };
        KeyResult::Command(command)
    }

    fn lex_visual_key(&mut self, c: char) -> KeyResult {
        if c == 'g' {
            self.g_prefix = true;
            return KeyResult::Pending;
        }

        let operator = match c {
            'd' | 'x' => Some(Operator::Delete),
            'c' | 's' => Some(Operator::Change),
            'y' => Some(Operator::Yank),
            '>' => Some(Operator::Indent),
            '<' => Some(Operator::Dedent),
            'u' => Some(Operator::Lowercase),
            'U' => Some(Operator::Uppercase),
            '~' => Some(Operator::ToggleCase),
            _ => None,
        };
        if let Some(operator) = operator {
            self.count.clear();
            return KeyResult::Command(VimCommand::VisualOperator(operator));
        }

        let typed = self.take_count();
        let command = match c {
            'o' => VimCommand::VisualSwapEnds,
            'q' if self.macros.is_recording() => VimCommand::StopRecording,
            'v' => VimCommand::EnterVisual { linewise: false },
            'V' => VimCommand::EnterVisual { linewise: true },
            ':' => VimCommand::EnterCommandLine(':'),
            _ => return self.motion_result(c, typed),
        };
        KeyResult::Command(command)
    }

    fn motion_result(&mut self, c: char, count: Option<usize>) -> KeyResult {
        match self.key_motion(c, count) {
            Ok(Some(motion)) => self.finish_motion(motion),
            Ok(None) => {
                self.clear_pending();
                KeyResult::Consumed
            }
            Err(err) => KeyResult::Command(VimCommand::Fail(err)),
        }
    }

    /// Convert a key to a motion, if possible.
    fn key_motion(&self, key: char, count: Option<usize>) -> Result<Option<Motion>, VimError> {
        let n = count.unwrap_or(1);
        let motion = match key {
            // Basic movement
            'h' => Motion::Left(n),
            'l' | ' ' => Motion::Right(n),
            'j' => Motion::Down(n),
            'k' => Motion::Up(n),

            // Token movement
            'w' | 'W' => Motion::WordForward(n),
            'b' | 'B' => Motion::WordBackward(n),
            'e' | 'E' => Motion::WordEnd(n),

            // Line movement
            '0' => Motion::LineStart,
            '^' => Motion::LineFirstNonBlank,
            '$' => Motion::LineEnd(n),

            // Document and paragraph movement
            'G' => Motion::DocumentEnd(count),
            '{' => Motion::ParagraphBackward(n),
            '}' => Motion::ParagraphForward(n),
            '%' => Motion::MatchingBracket,

            // Viewport
            'H' => Motion::ScreenTop(n),
            'M' => Motion::ScreenMiddle,
            'L' => Motion::ScreenBottom(n),

            // Repeats
            ';' | ',' => {
                let Some(search) = self.last_find else {
                    return Ok(None);
                };
                let search = if key == ',' { search.reversed() } else { search };
                Motion::FindChar {
                    search,
                    count: n,
                    repeat: true,
                }
            }
            'n' | 'N' => {
                let last = self
                    .last_search
                    .as_ref()
                    .ok_or(VimError::NoPreviousSearch)?;
                Motion::Search {
                    pattern: last.pattern.clone(),
                    forward: last.forward == (key == 'n'),
                    count: n,
                }
            }

            _ => return Ok(None),
        };
        Ok(Some(motion))
    }

    /// Route a completed motion to the pending operator, or move.
    fn finish_motion(&mut self, motion: Motion) -> KeyResult {
        match self.pending_operator.take() {
            Some(p) => KeyResult::Command(VimCommand::OperatorMotion {
                operator: p.operator,
                motion,
            }),
            None => KeyResult::Command(VimCommand::Move(motion)),
        }
    }

    /// The count for a motion: the operator count times the motion count.
    fn motion_count(&mut self) -> Option<usize> {
        let typed = self.take_count();
        let before = self.pending_operator.and_then(|p| p.count);
        match (before, typed) {
            (None, None) => None,
            (a, b) => Some((a.unwrap_or(1) * b.unwrap_or(1)).min(MAX_COUNT)),
        }
    }
}

fn delete_motion(motion: Motion) -> VimCommand {
    VimCommand::OperatorMotion {
        operator: Operator::Delete,
        motion,
    }
}
