//! Error types for imprint-vim
//!
//! None of these escape [`VimEngine::handle`](crate::VimEngine::handle): the
//! engine turns them into transient status messages.

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, VimError>;

/// Failures of a single command
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VimError {
    /// Search or substitute pattern does not compile
    #[error("Invalid pattern")]
    InvalidPattern { pattern: String },

    /// Search found no match anywhere in the buffer
    #[error("Not found")]
    NotFound,

    /// Ex command is neither built in nor registered by the host
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// Mark was never set
    #[error("Mark not set: {0}")]
    MarkNotSet(char),

    /// Register holds nothing to paste
    #[error("Nothing in register {0}")]
    EmptyRegister(char),

    /// Macro was never recorded
    #[error("Macro @{0} is empty")]
    EmptyMacro(char),

    /// `n`/`N` before any search
    #[error("No previous search pattern")]
    NoPreviousSearch,

    /// Macro playback nested deeper than the configured limit
    #[error("Macro recursion limit ({0}) reached")]
    MacroDepthExceeded(usize),

    /// A host ex-command reported a failure
    #[error("{0}")]
    Command(String),
}

/// Configuration loading/validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Value is out of valid range
    #[error("Value out of range: {0}")]
    OutOfRange(String),

    /// JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML deserialization failed
    #[cfg(feature = "toml-config")]
    #[error("TOML error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization failed
    #[cfg(feature = "toml-config")]
    #[error("TOML error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_messages() {
        let invalid = VimError::InvalidPattern {
            pattern: "(".to_string(),
        };
        assert_eq!(invalid.to_string(), "Invalid pattern");
        assert_eq!(VimError::NotFound.to_string(), "Not found");
        assert_eq!(
            VimError::UnknownCommand("frob".to_string()).to_string(),
            "Unknown command: frob"
        );
        assert_eq!(VimError::EmptyMacro('a').to_string(), "Macro @a is empty");
    }
}
