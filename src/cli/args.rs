//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--repo <file>`: Repository file for one-shot commands
//! - `--config <file>`: Configuration file
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output
//! - `--json`: Machine-readable output for read-only commands
//!
//! Repository commands are a separate [`RepoCommand`] enum so the
//! interactive shell can reuse them as-is.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::types::{BranchName, VersionId};

/// Snapline - a text versioning tool with named branches
#[derive(Parser, Debug)]
#[command(name = "snapline")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Repository file [default: from config, else snapline.db]
    #[arg(long, global = true, value_name = "FILE")]
    pub repo: Option<PathBuf>,

    /// Configuration file to use instead of the standard locations
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit JSON for status, branches, log, blog and show
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    #[command(flatten)]
    Repo(RepoCommand),

    /// Start an interactive session
    #[command(
        name = "shell",
        long_about = "Start an interactive session.\n\n\
            Reads one command per line from standard input. Every repository \
            command is available, plus commands to edit the working text \
            (set, append, erase) and to save or load repository files. The \
            session starts empty unless FILE is given.",
        after_help = "\
SESSION EXAMPLE:
    > set \"hello\"
    > commit first draft
    Committed as 1 on branch main
    > branch feat
    Created branch 'feat' at 1
    > save notes.db
    Saved to notes.db"
    )]
    Shell {
        /// Repository file to load first
        file: Option<PathBuf>,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
EXAMPLES:
    snapline completion bash > ~/.local/share/bash-completion/completions/snapline
    snapline completion zsh > ~/.zfunc/_snapline"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Commands that act on a repository.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum RepoCommand {
    /// Snapshot the working text as a new version
    #[command(
        name = "commit",
        long_about = "Snapshot the working text as a new version.\n\n\
            The new version's parent is the current HEAD. While attached to a \
            branch, the branch moves to the new version; while detached, only \
            HEAD moves. If the content is identical to the most recent \
            version, nothing is recorded.\n\n\
            Outside the shell the working text is the content of HEAD, so \
            use --content or --file to supply new text.",
        after_help = "\
EXAMPLES:
    snapline commit --content \"first line\" initial draft
    snapline commit --file notes.txt tidy wording"
    )]
    Commit {
        /// Commit message (words are joined with spaces)
        message: Vec<String>,

        /// Replace the working text with TEXT first
        #[arg(long, value_name = "TEXT", conflicts_with = "file")]
        content: Option<String>,

        /// Replace the working text with the contents of PATH first
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
    },

    /// Show history of the current branch (or all branches)
    #[command(name = "log")]
    Log {
        /// Show every branch
        #[arg(long)]
        all: bool,
    },

    /// Show history of one branch
    #[command(name = "blog")]
    Blog {
        /// Branch name
        name: BranchName,
    },

    /// Print the content of a version
    #[command(name = "show")]
    Show {
        /// Version id
        id: VersionId,
    },

    /// Load a version into the working text and detach HEAD there
    #[command(name = "checkout")]
    Checkout {
        /// Version id
        id: VersionId,
    },

    /// Create a branch at HEAD or at AT_ID
    #[command(name = "branch")]
    Branch {
        /// New branch name
        name: BranchName,

        /// Version the branch points at (0 for an empty branch)
        at: Option<VersionId>,
    },

    /// List branches
    #[command(name = "branches")]
    Branches,

    /// Attach HEAD to a branch and load its head
    #[command(name = "switch")]
    Switch {
        /// Branch name
        name: BranchName,
    },

    /// Delete a branch other than the current one
    #[command(name = "delete-branch")]
    DeleteBranch {
        /// Branch name
        name: BranchName,
    },

    /// Show the branch and HEAD state
    #[command(name = "status")]
    Status,

    /// Print the working text
    #[command(name = "print")]
    Print,
}

impl RepoCommand {
    /// Whether a successful run may change persisted state.
    pub fn mutates(&self) -> bool {
        matches!(
            self,
            RepoCommand::Commit { .. }
                | RepoCommand::Checkout { .. }
                | RepoCommand::Branch { .. }
                | RepoCommand::Switch { .. }
                | RepoCommand::DeleteBranch { .. }
        )
    }
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn commit_joins_words_and_takes_content() {
        let cli = parse(&["snapline", "commit", "--content", "AB", "second", "draft"]);
        assert_eq!(
            cli.command,
            Command::Repo(RepoCommand::Commit {
                message: vec!["second".into(), "draft".into()],
                content: Some("AB".into()),
                file: None,
            })
        );
    }

    #[test]
    fn content_and_file_conflict() {
        let result =
            Cli::try_parse_from(["snapline", "commit", "--content", "x", "--file", "f.txt"]);
        assert!(result.is_err());
    }

    #[test]
    fn ids_are_parsed_before_dispatch() {
        let cli = parse(&["snapline", "branch", "feat", "3"]);
        assert_eq!(
            cli.command,
            Command::Repo(RepoCommand::Branch {
                name: BranchName::new("feat").unwrap(),
                at: Some(VersionId::new(3)),
            })
        );

        assert!(Cli::try_parse_from(["snapline", "show", "abc"]).is_err());
        assert!(Cli::try_parse_from(["snapline", "checkout", "-1"]).is_err());
    }

    #[test]
    fn invalid_branch_name_rejected() {
        assert!(Cli::try_parse_from(["snapline", "switch", "two words"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = parse(&["snapline", "status", "--repo", "x.db", "--json", "-q"]);
        assert_eq!(cli.repo, Some(PathBuf::from("x.db")));
        assert!(cli.json);
        assert!(cli.quiet);
    }

    #[test]
    fn shell_file_is_optional() {
        let cli = parse(&["snapline", "shell"]);
        assert_eq!(cli.command, Command::Shell { file: None });
    }

    #[test]
    fn mutating_commands() {
        assert!(RepoCommand::Checkout { id: VersionId::new(1) }.mutates());
        assert!(!RepoCommand::Status.mutates());
        assert!(!RepoCommand::Log { all: true }.mutates());
    }
}
