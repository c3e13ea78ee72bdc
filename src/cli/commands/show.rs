//! show, status and print commands - Read-only views

use anyhow::Result;

use crate::cli::Context;
use crate::core::repo::Repository;
use crate::core::types::VersionId;
use crate::ui::output;

/// Print a version's content.
pub fn show(repo: &Repository, ctx: &Context, id: VersionId) -> Result<()> {
    let version = repo.show(id)?;
    if ctx.json {
        output::json(version)?;
    } else {
        output::data(&version.content);
    }
    Ok(())
}

/// Print where HEAD is.
pub fn status(repo: &Repository, ctx: &Context) -> Result<()> {
    let status = repo.status();
    if ctx.json {
        output::json(&status)?;
    } else {
        output::data(output::render_status(&status));
    }
    Ok(())
}

/// Print the working text.
pub fn print(repo: &Repository) -> Result<()> {
    output::data(repo.working());
    Ok(())
}
