//! Named registers for yanked and deleted text.
//!
//! Register names follow vim:
//! - `"` unnamed, written by every yank and delete
//! - `a`-`z` named, `A`-`Z` append to the lowercase register
//! - `0` last unnamed yank, `1`-`9` delete history, `-` small deletes
//! - `_` black hole, `:` last ex command, `/` last search pattern (read-only)

use std::collections::HashMap;

/// The contents of one register.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Register {
    pub text: String,
    /// Whole lines, pasted as new lines rather than inline.
    pub linewise: bool,
}

impl Register {
    pub fn new(text: impl Into<String>, linewise: bool) -> Self {
        Self {
            text: text.into(),
            linewise,
        }
    }

    pub fn charwise(text: impl Into<String>) -> Self {
        Self::new(text, false)
    }

    pub fn linewise(text: impl Into<String>) -> Self {
        Self::new(text, true)
    }
}

/// Whether a write came from a yank or a delete/change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterWrite {
    Yank,
    Delete,
}

/// Map from register name to contents.
#[derive(Debug, Clone)]
pub struct RegisterStore {
    registers: HashMap<char, Register>,
}

impl Default for RegisterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterStore {
    pub const UNNAMED: char = '"';
    pub const BLACK_HOLE: char = '_';

    pub fn new() -> Self {
        let mut registers = HashMap::new();
        registers.insert(Self::UNNAMED, Register::default());
        Self { registers }
    }

    /// Whether `"<c>` names a register.
    pub fn is_valid_name(c: char) -> bool {
        c.is_ascii_alphanumeric() || matches!(c, '"' | '-' | '_' | ':' | '/')
    }

    /// Read a register. Uppercase names read their lowercase register.
    pub fn get(&self, name: char) -> Option<&Register> {
        if name == Self::BLACK_HOLE {
            return None;
        }
        self.registers.get(&name.to_ascii_lowercase())
    }

    /// The unnamed register, which always exists.
    pub fn unnamed(&self) -> &Register {
        static EMPTY: Register = Register {
            text: String::new(),
            linewise: false,
        };
        self.registers.get(&Self::UNNAMED).unwrap_or(&EMPTY)
    }

    /// Store yanked or deleted text.
    ///
    /// `name` is the register selected with `"x`, or `None` for the default.
    pub fn store(&mut self, name: Option<char>, register: Register, kind: RegisterWrite) {
        match name {
            Some(Self::BLACK_HOLE) => return,
            Some(c) if c.is_ascii_uppercase() => {
                let target = c.to_ascii_lowercase();
                let merged = match self.registers.remove(&target) {
                    Some(existing) => append(existing, register),
                    None => register,
                };
                self.registers.insert(target, merged.clone());
                self.registers.insert(Self::UNNAMED, merged);
                return;
            }
            Some(c) if c != Self::UNNAMED && c != ':' && c != '/' => {
                self.registers.insert(c, register.clone());
            }
            _ => match kind {
                RegisterWrite::Yank => {
                    self.registers.insert('0', register.clone());
                }
                RegisterWrite::Delete if register.linewise || register.text.contains('\n') => {
                    for n in (1..9u32).rev() {
                        let from = char::from_digit(n, 10).unwrap_or('1');
                        let to = char::from_digit(n + 1, 10).unwrap_or('9');
                        if let Some(shifted) = self.registers.remove(&from) {
                            self.registers.insert(to, shifted);
                        }
                    }
                    self.registers.insert('1', register.clone());
                }
                RegisterWrite::Delete => {
                    self.registers.insert('-', register.clone());
                }
            },
        }
        self.registers.insert(Self::UNNAMED, register);
    }

    /// Record the last ex command line or search pattern (`:` and `/`).
    pub fn set_special(&mut self, name: char, text: impl Into<String>) {
        if matches!(name, ':' | '/') {
            self.registers.insert(name, Register::charwise(text));
        }
    }

    pub fn clear(&mut self) {
        self.registers.clear();
        self.registers.insert(Self::UNNAMED, Register::default());
    }
}

fn append(mut existing: Register, extra: Register) -> Register {
    if existing.linewise || extra.linewise {
        if !existing.text.is_empty() && !existing.text.ends_with('\n') {
            existing.text.push('\n');
        }
        existing.text.push_str(&extra.text);
        if !existing.text.ends_with('\n') {
            existing.text.push('\n');
        }
        existing.linewise = true;
    } else {
        existing.text.push_str(&extra.text);
    }
    existing
}
