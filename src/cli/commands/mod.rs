//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each repository command handler:
//! 1. Receives typed arguments (ids and names are parsed by clap)
//! 2. Calls one [`Repository`] operation
//! 3. Formats and displays output
//!
//! The same handlers serve one-shot invocations and the interactive shell.
//! One-shot invocations wrap them in lock, load and save.

mod branch;
mod commit;
mod completion;
mod log_cmd;
mod show;

pub use branch::{branch, branches, checkout, delete_branch, switch};
pub use commit::commit;
pub use completion::completion;
pub use log_cmd::{blog, log};
pub use show::{print, show, status};

use std::path::Path;

use anyhow::{Context as _, Result};
use tracing::debug;

use crate::cli::args::{Command, RepoCommand};
use crate::cli::{shell, Context};
use crate::core::lock::RepoLock;
use crate::core::repo::Repository;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Repo(command) => one_shot(command, ctx),
        Command::Shell { file } => shell::run(file.as_deref(), ctx),
        Command::Completion { shell } => completion(shell),
    }
}

/// Run one repository command against the repository file.
fn one_shot(command: RepoCommand, ctx: &Context) -> Result<()> {
    let path = ctx.repo_file.as_path();
    let _lock = RepoLock::acquire(path)?;

    let mut repo = open_repository(path)?;
    let mutates = command.mutates();
    execute(&mut repo, command, ctx)?;

    if mutates {
        repo.save(path)
            .with_context(|| format!("failed to save repository '{}'", path.display()))?;
    }
    Ok(())
}

/// Load `path`, or start empty if it does not exist yet.
pub fn open_repository(path: &Path) -> Result<Repository> {
    let mut repo = Repository::new();
    if path.exists() {
        repo.load(path)
            .with_context(|| format!("failed to load repository '{}'", path.display()))?;
    } else {
        debug!(path = %path.display(), "no repository file yet, starting empty");
    }
    Ok(repo)
}

/// Run a repository command against an open repository.
pub fn execute(repo: &mut Repository, command: RepoCommand, ctx: &Context) -> Result<()> {
    match command {
        RepoCommand::Commit {
            message,
            content,
            file,
        } => commit(repo, ctx, &message.join(" "), content, file.as_deref()),
        RepoCommand::Log { all } => log(repo, ctx, all),
        RepoCommand::Blog { name } => blog(repo, ctx, &name),
        RepoCommand::Show { id } => show(repo, ctx, id),
        RepoCommand::Checkout { id } => checkout(repo, ctx, id),
        RepoCommand::Branch { name, at } => branch(repo, ctx, name, at),
        RepoCommand::Branches => branches(repo, ctx),
        RepoCommand::Switch { name } => switch(repo, ctx, &name),
        RepoCommand::DeleteBranch { name } => delete_branch(repo, ctx, &name),
        RepoCommand::Status => status(repo, ctx),
        RepoCommand::Print => print(repo),
    }
}
