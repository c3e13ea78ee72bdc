//! core::config
//!
//! Configuration schema and loading.
//!
//! # Locations
//!
//! Searched in order, first existing file wins:
//! 1. The `--config` path, if given (must exist)
//! 2. `$SNAPLINE_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/snapline/config.toml`
//! 4. `~/.snapline/config.toml`
//!
//! No file at all means defaults. CLI flags override config values, but
//! that is applied by the caller, not here.
//!
//! # Example
//!
//! ```no_run
//! use snapline::core::config::Config;
//!
//! let config = Config::load(None).unwrap();
//! println!("prompt: {:?}", config.shell_prompt());
//! ```

pub mod schema;

pub use schema::{ConfigFile, DisplayConfig, ShellConfig};

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Repository file used when neither `--repo` nor config names one.
pub const DEFAULT_REPO_FILE: &str = "snapline.db";

/// Shell prompt used when config does not set one.
pub const DEFAULT_PROMPT: &str = "> ";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Loaded configuration with defaults applied through accessors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub file: ConfigFile,
    /// Where `file` came from, if anywhere
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration, preferring `explicit` over the standard locations.
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen file cannot be read, parsed or
    /// validated. An explicit path that does not exist is a read error;
    /// missing standard locations are not.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::search(),
        };
        match path {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// First existing file in the standard locations.
    fn search() -> Option<PathBuf> {
        let mut candidates = Vec::new();

        if let Some(path) = std::env::var_os("SNAPLINE_CONFIG") {
            candidates.push(PathBuf::from(path));
        }
        if let Some(xdg_home) = std::env::var_os("XDG_CONFIG_HOME") {
            candidates.push(PathBuf::from(xdg_home).join("snapline/config.toml"));
        }
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(".snapline/config.toml"));
        }

        candidates.into_iter().find(|path| path.exists())
    }

    /// Read, parse and validate one config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        file.validate()?;

        Ok(Self {
            file,
            path: Some(path.to_path_buf()),
        })
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Repository file for one-shot commands.
    ///
    /// Defaults to `snapline.db` in the current directory.
    pub fn repo_file(&self) -> PathBuf {
        self.file
            .repo
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REPO_FILE))
    }

    /// Configured diagnostic level, if any.
    pub fn log_level(&self) -> Option<&str> {
        self.file.log_level.as_deref()
    }

    /// Whether timestamps render in UTC.
    ///
    /// Defaults to `false` (local time).
    pub fn display_utc(&self) -> bool {
        self.file
            .display
            .as_ref()
            .and_then(|d| d.utc)
            .unwrap_or(false)
    }

    /// Shell prompt. Defaults to `"> "`.
    pub fn shell_prompt(&self) -> &str {
        self.file
            .shell
            .as_ref()
            .and_then(|s| s.prompt.as_deref())
            .unwrap_or(DEFAULT_PROMPT)
    }

    /// Whether the shell prints its command summary on start.
    ///
    /// Defaults to `true`.
    pub fn shell_banner(&self) -> bool {
        self.file
            .shell
            .as_ref()
            .and_then(|s| s.banner)
            .unwrap_or(true)
    }

    /// Get the path the configuration was loaded from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn defaults() {
        let config = Config::default();

        assert_eq!(config.repo_file(), PathBuf::from("snapline.db"));
        assert!(config.log_level().is_none());
        assert!(!config.display_utc());
        assert_eq!(config.shell_prompt(), "> ");
        assert!(config.shell_banner());
        assert!(config.loaded_from().is_none());
    }

    #[test]
    fn load_explicit_file() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            r#"
            repo = "work.db"
            log_level = "debug"

            [display]
            utc = true

            [shell]
            prompt = "$ "
            banner = false
            "#,
        );

        let config = Config::load(Some(&path)).unwrap();

        assert_eq!(config.repo_file(), PathBuf::from("work.db"));
        assert_eq!(config.log_level(), Some("debug"));
        assert!(config.display_utc());
        assert_eq!(config.shell_prompt(), "$ ");
        assert!(!config.shell_banner());
        assert_eq!(config.loaded_from(), Some(path.as_path()));
    }

    #[test]
    fn explicit_missing_file_is_error() {
        let temp = TempDir::new().unwrap();
        let result = Config::load(Some(&temp.path().join("absent.toml")));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn parse_error_names_file() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "repo = ");

        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn invalid_value_rejected() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "log_level = \"chatty\"");

        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn unknown_fields_rejected() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "trunk = \"main\"");

        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }
}
