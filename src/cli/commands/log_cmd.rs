//! log and blog commands - Display version history

use anyhow::Result;

use crate::cli::Context;
use crate::core::repo::{History, LogScope, Repository};
use crate::core::types::BranchName;
use crate::ui::output;

/// Show the current branch's history, or every branch's with `all`.
pub fn log(repo: &Repository, ctx: &Context, all: bool) -> Result<()> {
    let scope = if all { LogScope::All } else { LogScope::Current };
    display(&repo.log(&scope)?, ctx)
}

/// Show one branch's history.
pub fn blog(repo: &Repository, ctx: &Context, name: &BranchName) -> Result<()> {
    display(&repo.log(&LogScope::Branch(name.clone()))?, ctx)
}

fn display(histories: &[History<'_>], ctx: &Context) -> Result<()> {
    if ctx.json {
        output::json(histories)?;
        return Ok(());
    }
    for history in histories {
        output::data(output::render_history(history, ctx.utc));
    }
    Ok(())
}
