//! cli::shell
//!
//! Interactive session over one in-memory repository.
//!
//! # Architecture
//!
//! Each input line is split into tokens (whitespace separated, `"..."`
//! groups with `\` escapes) and handed to clap as a [`ShellLine`], so shell
//! commands get the same typed parsing as process arguments. Repository
//! commands run through the shared handlers in [`crate::cli::commands`].
//!
//! Errors never end the session: they are printed and the next line is
//! read. Only `exit`, `quit` or end of input stop the loop.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::{CommandFactory, Parser, Subcommand};
use thiserror::Error;
use tracing::debug;

use crate::cli::args::RepoCommand;
use crate::cli::{commands, Context};
use crate::core::persist::quoted::{read_quoted, QuotedError};
use crate::core::repo::Repository;
use crate::ui::output;

/// One parsed shell line.
#[derive(Parser, Debug)]
#[command(
    name = "snapline",
    no_binary_name = true,
    disable_version_flag = true,
    help_template = "Commands:\n{subcommands}"
)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

/// Commands accepted by the shell.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    #[command(flatten)]
    Repo(RepoCommand),

    /// Replace the working text (words are joined with spaces)
    Set {
        #[arg(allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Append to the working text
    Append {
        #[arg(allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Remove LEN bytes starting at POS from the working text
    Erase { pos: usize, len: usize },

    /// Save the repository to FILE
    Save { file: PathBuf },

    /// Replace the repository with the contents of FILE
    Load { file: PathBuf },

    /// Leave the shell
    #[command(alias = "quit")]
    Exit,
}

/// A line that could not be split into tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    #[error("unterminated quote")]
    Unterminated,
}

/// Split a line into tokens.
///
/// # Example
///
/// ```
/// use snapline::cli::shell::tokenize;
///
/// let tokens = tokenize(r#"commit "first draft" now"#).unwrap();
/// assert_eq!(tokens, ["commit", "first draft", "now"]);
/// ```
pub fn tokenize(line: &str) -> Result<Vec<String>, TokenizeError> {
    let mut tokens = Vec::new();
    let mut rest = line;
    loop {
        match read_quoted(rest) {
            Ok((token, used)) => {
                tokens.push(token);
                rest = &rest[used..];
            }
            Err(QuotedError::Missing) => return Ok(tokens),
            Err(QuotedError::Unterminated) => return Err(TokenizeError::Unterminated),
        }
    }
}

/// Whether the loop keeps reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Shell state: the repository plus output settings.
pub struct Session<'c> {
    repo: Repository,
    ctx: &'c Context,
}

impl<'c> Session<'c> {
    /// Start with an empty repository.
    pub fn new(ctx: &'c Context) -> Self {
        Self {
            repo: Repository::new(),
            ctx,
        }
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Read lines from `input` until `exit` or end of input.
    pub fn run_lines<R: BufRead>(&mut self, mut input: R) -> Result<()> {
        let mut stdout = io::stdout();
        let mut line = String::new();
        loop {
            write!(stdout, "{}", self.ctx.prompt)?;
            stdout.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                debug!("end of input");
                return Ok(());
            }
            if self.handle_line(&line) == Flow::Exit {
                return Ok(());
            }
        }
    }

    /// Parse and run one line, printing any error.
    pub fn handle_line(&mut self, line: &str) -> Flow {
        let tokens = match tokenize(line) {
            Ok(tokens) if tokens.is_empty() => return Flow::Continue,
            Ok(tokens) => tokens,
            Err(e) => {
                output::error(e);
                return Flow::Continue;
            }
        };

        let command = match ShellLine::try_parse_from(tokens) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                let _ = e.print();
                return Flow::Continue;
            }
        };

        match self.execute(command) {
            Ok(flow) => flow,
            Err(e) => {
                output::error(format!("{e:#}"));
                Flow::Continue
            }
        }
    }

    /// Run one parsed command.
    pub fn execute(&mut self, command: ShellCommand) -> Result<Flow> {
        match command {
            ShellCommand::Repo(command) => commands::execute(&mut self.repo, command, self.ctx)?,
            ShellCommand::Set { text } => self.repo.working_mut().set(text.join(" ")),
            ShellCommand::Append { text } => self.repo.working_mut().append(&text.join(" ")),
            ShellCommand::Erase { pos, len } => self.repo.working_mut().erase(pos, len)?,
            ShellCommand::Save { file } => {
                self.repo
                    .save(&file)
                    .with_context(|| format!("failed to save '{}'", file.display()))?;
                output::print(format!("Saved to {}", file.display()), self.ctx.verbosity);
            }
            ShellCommand::Load { file } => self.load(&file)?,
            ShellCommand::Exit => return Ok(Flow::Exit),
        }
        Ok(Flow::Continue)
    }

    /// Replace the repository with the contents of `file`.
    pub fn load(&mut self, file: &Path) -> Result<()> {
        self.repo
            .load(file)
            .with_context(|| format!("failed to load '{}'", file.display()))?;
        output::print(format!("Loaded from {}", file.display()), self.ctx.verbosity);
        Ok(())
    }
}

/// The command summary printed by `help` and on start.
pub fn help_text() -> String {
    ShellLine::command().render_help().to_string()
}

/// Run the interactive shell on stdin.
pub fn run(file: Option<&Path>, ctx: &Context) -> Result<()> {
    let mut session = Session::new(ctx);

    if ctx.banner {
        output::print(help_text(), ctx.verbosity);
    }
    if let Some(file) = file {
        if let Err(e) = session.load(file) {
            output::error(format!("{e:#}"));
        }
    }

    let stdin = io::stdin();
    session.run_lines(stdin.lock())
}
