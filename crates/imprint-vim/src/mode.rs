//! Vim editing modes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The editing mode. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VimMode {
    /// Normal mode - navigation, operators and commands (default).
    #[default]
    Normal,
    /// Insert mode - the host inserts typed text.
    Insert,
    /// Characterwise visual selection.
    Visual,
    /// Linewise visual selection.
    VisualLine,
    /// Typing a `:`, `/` or `?` command line.
    Command,
    /// Typed characters overwrite the buffer.
    Replace,
}

impl VimMode {
    /// Returns the display name for this mode.
    pub fn display_name(&self) -> &'static str {
        match self {
            VimMode::Normal => "NORMAL",
            VimMode::Insert => "INSERT",
            VimMode::Visual => "VISUAL",
            VimMode::VisualLine => "VISUAL LINE",
            VimMode::Command => "COMMAND",
            VimMode::Replace => "REPLACE",
        }
    }

    /// Returns a short code for this mode (for compact display).
    pub fn short_code(&self) -> &'static str {
        match self {
            VimMode::Normal => "NOR",
            VimMode::Insert => "INS",
            VimMode::Visual => "VIS",
            VimMode::VisualLine => "V-L",
            VimMode::Command => "CMD",
            VimMode::Replace => "REP",
        }
    }

    pub fn is_visual(&self) -> bool {
        matches!(self, VimMode::Visual | VimMode::VisualLine)
    }

    /// Whether the cursor may sit one past the last character of a line.
    pub fn allows_past_end(&self) -> bool {
        matches!(self, VimMode::Insert | VimMode::Replace)
    }
}

impl fmt::Display for VimMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mode() {
        assert_eq!(VimMode::default(), VimMode::Normal);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(VimMode::Normal.display_name(), "NORMAL");
        assert_eq!(VimMode::VisualLine.display_name(), "VISUAL LINE");
        assert_eq!(VimMode::Replace.to_string(), "REPLACE");
    }

    #[test]
    fn test_short_codes() {
        assert_eq!(VimMode::Insert.short_code(), "INS");
        assert_eq!(VimMode::Command.short_code(), "CMD");
    }

    #[test]
    fn test_classification() {
        assert!(VimMode::Visual.is_visual());
        assert!(VimMode::VisualLine.is_visual());
        assert!(!VimMode::Normal.is_visual());
        assert!(VimMode::Insert.allows_past_end());
        assert!(!VimMode::Visual.allows_past_end());
    }

    #[test]
    fn test_serializes_as_label() {
        let json = serde_json::to_string(&VimMode::VisualLine).unwrap();
        assert_eq!(json, "\"VISUAL_LINE\"");
    }
}
