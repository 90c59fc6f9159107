//! Raw input events and key notation.
//!
//! Keys are described with crossterm's [`KeyCode`] and [`KeyModifiers`] so a
//! terminal front end can forward its events untouched. Hosts that are not
//! terminals build [`KeyInput`]s directly or parse them from notation such as
//! `"d2w"`, `"ihello<Esc>"` or `"<C-r>"`.

use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A single key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyInput {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyInput {
    /// A key with no modifiers.
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// A printable character.
    pub fn char(c: char) -> Self {
        Self::new(KeyCode::Char(c))
    }

    /// A control chord, e.g. `KeyInput::ctrl('r')`.
    pub fn ctrl(c: char) -> Self {
        Self {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::CONTROL,
        }
    }

    pub fn esc() -> Self {
        Self::new(KeyCode::Esc)
    }

    pub fn enter() -> Self {
        Self::new(KeyCode::Enter)
    }

    pub fn backspace() -> Self {
        Self::new(KeyCode::Backspace)
    }

    fn has_command_modifier(&self) -> bool {
        self.modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER)
    }

    /// Escape or its `Ctrl-[` alias.
    pub fn is_escape(&self) -> bool {
        match self.code {
            KeyCode::Esc => true,
            KeyCode::Char('[') => self.modifiers.contains(KeyModifiers::CONTROL),
            _ => false,
        }
    }

    pub fn is_enter(&self) -> bool {
        matches!(self.code, KeyCode::Enter)
    }

    pub fn is_backspace(&self) -> bool {
        matches!(self.code, KeyCode::Backspace)
    }

    /// Arrow keys are never interpreted by the engine.
    pub fn is_arrow(&self) -> bool {
        matches!(
            self.code,
            KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down
        )
    }

    /// The character this key types, if it is a plain (optionally shifted) character.
    pub fn printable(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) if !self.has_command_modifier() => Some(c),
            _ => None,
        }
    }

    /// The character of a `Ctrl-<c>` chord, lowercased.
    pub fn ctrl_char(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) if self.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(c.to_ascii_lowercase())
            }
            _ => None,
        }
    }
}

impl From<KeyEvent> for KeyInput {
    fn from(event: KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }
}

impl From<char> for KeyInput {
    fn from(c: char) -> Self {
        Self::char(c)
    }
}

impl fmt::Display for KeyInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(c) = self.ctrl_char() {
            return write!(f, "<C-{}>", c);
        }
        match self.code {
            KeyCode::Char('<') => write!(f, "<lt>"),
            KeyCode::Char(' ') => write!(f, "<Space>"),
            KeyCode::Char(c) => write!(f, "{}", c),
            KeyCode::Esc => write!(f, "<Esc>"),
            KeyCode::Enter => write!(f, "<CR>"),
            KeyCode::Backspace => write!(f, "<BS>"),
            KeyCode::Tab => write!(f, "<Tab>"),
            KeyCode::Left => write!(f, "<Left>"),
            KeyCode::Right => write!(f, "<Right>"),
            KeyCode::Up => write!(f, "<Up>"),
            KeyCode::Down => write!(f, "<Down>"),
            KeyCode::Delete => write!(f, "<Del>"),
            other => write!(f, "<{:?}>", other),
        }
    }
}

/// An event delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A key press.
    Key(KeyInput),
    /// IME composition started.
    CompositionStart,
    /// IME composition text changed.
    CompositionUpdate(String),
    /// IME composition committed this text (already inserted by the host).
    CompositionEnd(String),
}

impl From<KeyInput> for InputEvent {
    fn from(key: KeyInput) -> Self {
        InputEvent::Key(key)
    }
}

impl From<KeyEvent> for InputEvent {
    fn from(event: KeyEvent) -> Self {
        InputEvent::Key(event.into())
    }
}

/// Parse a key-notation string into key presses.
///
/// Plain characters stand for themselves. Angle-bracket names are
/// case-insensitive: `<Esc>`, `<CR>`/`<Enter>`, `<BS>`, `<Tab>`, `<Space>`,
/// `<lt>`, `<Del>`, arrow names and `<C-x>` chords. An unrecognised `<...>`
/// group is taken literally.
pub fn parse_keys(notation: &str) -> Vec<KeyInput> {
    let chars: Vec<char> = notation.chars().collect();
    let mut keys = Vec::with_capacity(chars.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '<' {
            if let Some(close) = chars[i + 1..].iter().position(|&c| c == '>') {
                let name: String = chars[i + 1..i + 1 + close].iter().collect();
                if let Some(key) = parse_named_key(&name) {
                    keys.push(key);
                    i += close + 2;
                    continue;
                }
            }
        }
        keys.push(KeyInput::char(chars[i]));
        i += 1;
    }

    keys
}

fn parse_named_key(name: &str) -> Option<KeyInput> {
    let lower = name.to_ascii_lowercase();
    let key = match lower.as_str() {
        "esc" => KeyInput::esc(),
        "cr" | "enter" | "return" => KeyInput::enter(),
        "bs" | "backspace" => KeyInput::backspace(),
        "tab" => KeyInput::new(KeyCode::Tab),
        "space" => KeyInput::char(' '),
        "lt" => KeyInput::char('<'),
        "del" => KeyInput::new(KeyCode::Delete),
        "left" => KeyInput::new(KeyCode::Left),
        "right" => KeyInput::new(KeyCode::Right),
        "up" => KeyInput::new(KeyCode::Up),
        "down" => KeyInput::new(KeyCode::Down),
        _ => {
            let rest = lower.strip_prefix("c-")?;
            let mut chars = rest.chars();
            let c = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            KeyInput::ctrl(c)
        }
    };
    Some(key)
}

/// Render key presses back into notation.
pub fn format_keys(keys: &[KeyInput]) -> String {
    keys.iter().map(|k| k.to_string()).collect()
}
