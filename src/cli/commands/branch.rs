//! branch, branches, switch, delete-branch and checkout commands

use anyhow::Result;

use crate::cli::Context;
use crate::core::graph::SwitchOutcome;
use crate::core::repo::Repository;
use crate::core::types::{BranchName, VersionId};
use crate::ui::output;

/// Create a branch at `at`, or at HEAD.
pub fn branch(
    repo: &mut Repository,
    ctx: &Context,
    name: BranchName,
    at: Option<VersionId>,
) -> Result<()> {
    let message = format!("Created branch '{name}'");
    let at = repo.create_branch(name, at)?;
    output::print(format!("{message} at {at}"), ctx.verbosity);
    Ok(())
}

/// List branches.
pub fn branches(repo: &Repository, ctx: &Context) -> Result<()> {
    let listing = repo.list_branches();
    if ctx.json {
        output::json(&listing)?;
    } else if !listing.branches.is_empty() || listing.detached_head.is_some() {
        output::data(output::render_branches(&listing, repo.store()));
    }
    Ok(())
}

/// Attach HEAD to a branch.
pub fn switch(repo: &mut Repository, ctx: &Context, name: &BranchName) -> Result<()> {
    if let SwitchOutcome::HeadInvalid { stale } = repo.switch(name)? {
        output::warn(
            format!("branch head {stale} invalid, resetting '{name}' to 0"),
            ctx.verbosity,
        );
    }
    output::print(format!("Switched to branch {name}"), ctx.verbosity);
    Ok(())
}

/// Delete a branch other than the current one.
pub fn delete_branch(repo: &mut Repository, ctx: &Context, name: &BranchName) -> Result<()> {
    repo.delete_branch(name)?;
    output::print(format!("Deleted branch '{name}'"), ctx.verbosity);
    Ok(())
}

/// Detach HEAD at a version.
pub fn checkout(repo: &mut Repository, ctx: &Context, id: VersionId) -> Result<()> {
    repo.checkout(id)?;
    output::print(format!("Checked out {id} (detached)"), ctx.verbosity);
    Ok(())
}
