//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Validation
//!
//! Config values are validated after parsing: `log_level` must name a
//! tracing level and the shell prompt must be a single line.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Accepted values for `log_level`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Contents of `config.toml`.
///
/// # Example
///
/// ```toml
/// repo = "/home/me/notes.db"
/// log_level = "info"
///
/// [display]
/// utc = true
///
/// [shell]
/// prompt = "snap> "
/// banner = false
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Repository file used by one-shot commands
    pub repo: Option<PathBuf>,

    /// Default diagnostic level
    pub log_level: Option<String>,

    /// Output rendering
    pub display: Option<DisplayConfig>,

    /// Interactive shell settings
    pub shell: Option<ShellConfig>,
}

impl ConfigFile {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(level) = &self.log_level {
            if !LOG_LEVELS.contains(&level.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid log_level '{}', must be one of: {}",
                    level,
                    LOG_LEVELS.join(", ")
                )));
            }
        }

        if let Some(repo) = &self.repo {
            if repo.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue("repo cannot be empty".to_string()));
            }
        }

        if let Some(shell) = &self.shell {
            shell.validate()?;
        }

        Ok(())
    }
}

/// Output rendering settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Render timestamps in UTC instead of local time
    pub utc: Option<bool>,
}

/// Interactive shell settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ShellConfig {
    /// Prompt printed before each line
    pub prompt: Option<String>,

    /// Print the command summary on start
    pub banner: Option<bool>,
}

impl ShellConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(prompt) = &self.prompt {
            if prompt.contains('\n') {
                return Err(ConfigError::InvalidValue(
                    "shell prompt cannot contain a newline".to_string(),
                ));
            }
        }
        Ok(())
    }
}
