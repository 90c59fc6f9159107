//! Feedback the engine exposes to the host UI.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::mode::VimMode;

/// Severity of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Info,
    Warning,
    Error,
}

/// A transient message for the status line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub text: String,
    pub kind: MessageKind,
    /// How long the host should show the message. `None` means until replaced.
    pub duration: Option<Duration>,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>, duration: Option<Duration>) -> Self {
        Self {
            text: text.into(),
            kind: MessageKind::Info,
            duration,
        }
    }

    pub fn warning(text: impl Into<String>, duration: Option<Duration>) -> Self {
        Self {
            text: text.into(),
            kind: MessageKind::Warning,
            duration,
        }
    }

    pub fn error(text: impl Into<String>, duration: Option<Duration>) -> Self {
        Self {
            text: text.into(),
            kind: MessageKind::Error,
            duration,
        }
    }
}

/// Snapshot of everything a status bar needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStatus {
    pub mode: VimMode,
    /// `"-- INSERT --"` style label; empty in normal mode.
    pub mode_label: String,
    /// Three-letter mode code for compact displays.
    pub mode_code: String,
    /// Keys typed so far for an incomplete command (register, count, operator).
    pub pending_keys: String,
    /// The command line being typed, including its `:`, `/` or `?` prefix.
    pub command_line: Option<String>,
    /// Register currently receiving a macro recording.
    pub recording: Option<char>,
    pub message: Option<StatusMessage>,
}

impl EngineStatus {
    /// The label vim shows for a mode.
    pub fn label_for(mode: VimMode, recording: Option<char>) -> String {
        let base = match mode {
            VimMode::Normal | VimMode::Command => String::new(),
            other => format!("-- {} --", other.display_name()),
        };
        match recording {
            Some(reg) if base.is_empty() => format!("recording @{}", reg),
            Some(reg) => format!("{} recording @{}", base, reg),
            None => base,
        }
    }
}
