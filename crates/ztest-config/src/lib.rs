//! Grammar configuration for ztest case files.
//!
//! The parser supports a single grammar whose tunable parts (comment markers,
//! fence characters, sentinels) are described by
//! [`GrammarConfig`]. Every field has a default, so a TOML file only needs to
//! name what it overrides:
//!
//! ```toml
//! comment_markers = ["#"]
//! heredoc_sentinel = "__END__"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid grammar: {0}")]
    InvalidGrammar(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrammarConfig {
    /// Markers that start a comment line after optional leading whitespace.
    pub comment_markers: Vec<String>,
    /// Characters whose runs of three or more open and close a string block.
    pub fence_chars: Vec<char>,
    /// Line terminating a headless item body without fencing.
    pub heredoc_sentinel: String,
    /// Whether the file may open with a preamble terminated by `preamble_sentinel`.
    pub preamble: bool,
    /// Line separating the leading preamble from the cases.
    pub preamble_sentinel: String,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            comment_markers: vec!["#".to_string(), "//".to_string()],
            fence_chars: vec!['`', '~'],
            heredoc_sentinel: "__EOF__".to_string(),
            preamble: true,
            preamble_sentinel: "__DATA__".to_string(),
        }
    }
}

impl GrammarConfig {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: GrammarConfig =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        config.validate()?;
        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    /// Loads the per-user config, falling back to the defaults when none exists.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        Ok(Self::load()?.unwrap_or_default())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/ztest");
        PathBuf::from(config_dir.as_ref()).join("grammar.toml")
    }

    /// Checks that the configured grammar can be lexed unambiguously.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.comment_markers.is_empty() {
            return Err(invalid("at least one comment marker is required"));
        }
        if let Some(marker) = self
            .comment_markers
            .iter()
            .find(|m| m.is_empty() || m.chars().any(char::is_whitespace))
        {
            return Err(invalid(format!("comment marker {marker:?} is empty or contains whitespace")));
        }
        // Would shadow item and case header lines.
        if let Some(marker) = self
            .comment_markers
            .iter()
            .find(|m| m.starts_with(['-', '=']))
        {
            return Err(invalid(format!("comment marker {marker:?} starts like an item or case line")));
        }

        if self.fence_chars.is_empty() {
            return Err(invalid("at least one fence character is required"));
        }
        for (i, c) in self.fence_chars.iter().enumerate() {
            if !c.is_ascii_punctuation() {
                return Err(invalid(format!("fence character {c:?} is not ASCII punctuation")));
            }
            if self.fence_chars[..i].contains(c) {
                return Err(invalid(format!("fence character {c:?} is listed twice")));
            }
        }

        check_sentinel("heredoc_sentinel", &self.heredoc_sentinel)?;
        check_sentinel("preamble_sentinel", &self.preamble_sentinel)?;
        if self.heredoc_sentinel == self.preamble_sentinel {
            return Err(invalid("heredoc and preamble sentinels must differ"));
        }

        Ok(())
    }
}

fn check_sentinel(field: &str, sentinel: &str) -> Result<(), ConfigError> {
    if sentinel.is_empty() || sentinel.chars().any(char::is_whitespace) {
        return Err(invalid(format!(
            "{field} {sentinel:?} is empty or contains whitespace"
        )));
    }
    Ok(())
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::InvalidGrammar(msg.into())
}
