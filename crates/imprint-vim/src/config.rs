//! Configuration for imprint-vim
//!
//! Indentation, history bounds and message timing for the modal engine.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VimConfig {
    /// Width of one indent unit for `>` and `<`
    pub tab_width: usize,
    /// Indent with spaces (true) or a tab character (false)
    pub expand_tab: bool,
    /// Maximum number of entries kept in the jump list
    pub jump_list_capacity: usize,
    /// Maximum nesting of macro playback (`@a` calling `@a` ...)
    pub max_macro_depth: usize,
    /// Auto-dismiss time for transient messages, in milliseconds
    pub message_duration_ms: Option<u64>,
    /// Whether searches wrap around the buffer ends
    pub search_wraps: bool,
    /// Whether `/`, `?`, `n`, `N`, `*`, `#` ignore case
    pub ignore_case: bool,
}

impl Default for VimConfig {
    fn default() -> Self {
        Self {
            tab_width: 4,
            expand_tab: true,
            jump_list_capacity: 100,
            max_macro_depth: 32,
            message_duration_ms: Some(2000),
            search_wraps: true,
            ignore_case: true,
        }
    }
}

impl VimConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// The text inserted by one `>`.
    pub fn indent_unit(&self) -> String {
        if self.expand_tab {
            " ".repeat(self.tab_width)
        } else {
            "\t".to_string()
        }
    }

    /// Auto-dismiss duration for transient messages.
    pub fn message_duration(&self) -> Option<Duration> {
        self.message_duration_ms.map(Duration::from_millis)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load configuration from a TOML string
    #[cfg(feature = "toml-config")]
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML
    #[cfg(feature = "toml-config")]
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tab_width == 0 || self.tab_width > 16 {
            return Err(ConfigError::OutOfRange(
                "tab_width must be between 1 and 16".to_string(),
            ));
        }

        if self.jump_list_capacity == 0 {
            return Err(ConfigError::OutOfRange(
                "jump_list_capacity must be positive".to_string(),
            ));
        }

        if self.max_macro_depth == 0 {
            return Err(ConfigError::OutOfRange(
                "max_macro_depth must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = VimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.indent_unit(), "    ");
        assert_eq!(config.message_duration(), Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_tab_indent_unit() {
        let config = VimConfig {
            expand_tab: false,
            ..VimConfig::default()
        };
        assert_eq!(config.indent_unit(), "\t");
    }

    #[test]
    fn test_json_serialization() {
        let config = VimConfig {
            tab_width: 2,
            ..VimConfig::default()
        };
        let json = config.to_json().unwrap();
        let parsed = VimConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let parsed = VimConfig::from_json(r#"{ "tab_width": 8 }"#).unwrap();
        assert_eq!(parsed.tab_width, 8);
        assert_eq!(parsed.jump_list_capacity, 100);
    }

    #[test]
    fn test_out_of_range() {
        let mut config = VimConfig::default();
        config.tab_width = 0;
        assert!(config.validate().is_err());

        let mut config = VimConfig::default();
        config.max_macro_depth = 0;
        assert!(config.validate().is_err());

        assert!(VimConfig::from_json(r#"{ "jump_list_capacity": 0 }"#).is_err());
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_toml_round_trip() {
        let config = VimConfig::default();
        let text = config.to_toml().unwrap();
        assert_eq!(VimConfig::from_toml(&text).unwrap(), config);
    }
}
