//! cli
//!
//! Command-line interface layer for Snapline.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Resolve configuration and install logging
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. Flags and config are folded into a [`Context`]
//! once, then [`commands::dispatch`] runs either a single repository
//! command against the repository file or the interactive [`shell`].

pub mod args;
pub mod commands;
pub mod shell;

pub use args::{Cli, Command, RepoCommand, Shell};

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use tracing::debug;

use crate::core::config::Config;
use crate::logging;
use crate::ui::output::Verbosity;

/// Settings every command handler sees, with flags already applied over
/// config values.
#[derive(Debug, Clone)]
pub struct Context {
    /// Repository file for one-shot commands
    pub repo_file: PathBuf,
    pub verbosity: Verbosity,
    /// Emit JSON from read-only commands
    pub json: bool,
    /// Render timestamps in UTC
    pub utc: bool,
    pub prompt: String,
    /// Print the command summary when the shell starts
    pub banner: bool,
}

impl Default for Context {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl Context {
    /// Context with config values and no flag overrides.
    pub fn from_config(config: &Config) -> Self {
        Self {
            repo_file: config.repo_file(),
            verbosity: Verbosity::Normal,
            json: false,
            utc: config.display_utc(),
            prompt: config.shell_prompt().to_string(),
            banner: config.shell_banner(),
        }
    }

    /// Apply command-line flags.
    pub fn with_flags(mut self, cli: &Cli) -> Self {
        if let Some(repo) = &cli.repo {
            self.repo_file = repo.clone();
        }
        self.verbosity = Verbosity::from_flags(cli.quiet, cli.debug);
        self.json = cli.json;
        self
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    logging::init_logging(cli.debug, config.log_level());
    if let Some(path) = config.loaded_from() {
        debug!(path = %path.display(), "loaded configuration");
    }

    let ctx = Context::from_config(&config).with_flags(&cli);
    commands::dispatch(cli.command, &ctx)
}
