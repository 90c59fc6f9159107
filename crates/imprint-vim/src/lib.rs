//! Vim-style modal editing for imprint's manuscript editor.
//!
//! This crate interprets keystrokes the way Vim does and drives any text
//! widget that implements [`TextHost`]. The engine never owns text: it reads
//! lines, edits ranges and moves the cursor through the host.
//!
//! # Features
//!
//! - **Modal editing**: Normal, Insert, Visual, Visual Line, Replace and Command modes
//! - **Operator + Motion**: compositions like `dw`, `c$`, `y2j`, `3>>`, `gUiw`
//! - **Text Objects**: inner/around objects like `diw`, `ci"`, `da(`
//! - **Registers, Macros and Marks**: `"ayy`, `qa...q`, `@a`, `ma`, `'a`
//! - **Jump List**: `Ctrl-O` / `Ctrl-I` across searches and long motions
//! - **Command Line**: `/pattern`, `?pattern`, `:42`, `:s/old/new/g` and
//!   application commands registered with [`VimEngine::register_command`]
//! - **Dot Repeat**: `.` replays the last change by effect
//!
//! # Configuration
//!
//! [`VimConfig`] loads from JSON, or from TOML with the `toml-config` feature:
//!
//! ```toml
//! imprint-vim = { version = "0.1", features = ["toml-config"] }
//! ```
//!
//! # Example
//!
//! ```
//! use imprint_vim::{parse_keys, MemoryHost, TextBuffer, VimEngine, VimMode};
//!
//! let mut engine = VimEngine::default();
//! let mut host = MemoryHost::new("foo bar baz");
//!
//! engine.feed_keys(&parse_keys("wdw"), &mut host);
//! assert_eq!(host.full_text(), "foo baz");
//!
//! engine.feed_keys(&parse_keys("A!<Esc>"), &mut host);
//! assert_eq!(host.full_text(), "foo baz!");
//! assert_eq!(engine.mode(), VimMode::Normal);
//! ```

mod command;
pub mod command_line;
mod config;
mod engine;
mod error;
mod host;
pub mod jump_list;
mod key;
mod key_handler;
pub mod macros;
pub mod marks;
mod memory_host;
mod mode;
pub mod motion;
pub mod operator;
mod position;
pub mod registers;
pub mod search;
mod state;
mod status;
pub mod text_object;

pub use command::{InsertKind, VimCommand};
pub use command_line::{ExCommand, ExCommandRegistry, Substitute, SubstituteReport};
pub use config::VimConfig;
pub use engine::VimEngine;
pub use error::{ConfigError, Result, VimError};
pub use host::{position_after, TextBuffer, TextHost};
pub use jump_list::JumpList;
pub use key::{format_keys, parse_keys, InputEvent, KeyInput};
pub use key_handler::KeyResult;
pub use macros::MacroStore;
pub use marks::MarkStore;
pub use memory_host::MemoryHost;
pub use mode::VimMode;
pub use motion::Motion;
pub use operator::{Operator, OperatorSpan};
pub use position::{Position, Range};
pub use registers::{Register, RegisterStore};
pub use state::{EditAction, EditTarget, LastEdit, PendingChar, PendingOperator, VimState};
pub use status::{EngineStatus, MessageKind, StatusMessage};
pub use text_object::{TextObject, TextObjectModifier};

pub use crossterm::event::{KeyCode, KeyModifiers};
