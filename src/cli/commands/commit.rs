//! commit command - Snapshot the working text

use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::core::repo::Repository;
use crate::ui::output;

/// Commit the working text, optionally replacing it first.
///
/// # Arguments
///
/// * `message` - Commit message
/// * `content` - New working text
/// * `file` - File whose contents become the working text
pub fn commit(
    repo: &mut Repository,
    ctx: &Context,
    message: &str,
    content: Option<String>,
    file: Option<&Path>,
) -> Result<()> {
    if let Some(path) = file {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read '{}'", path.display()))?;
        repo.working_mut().set(text);
    } else if let Some(text) = content {
        repo.working_mut().set(text);
    }

    let outcome = repo.commit(message);
    output::print(
        output::render_commit(outcome, &repo.status()),
        ctx.verbosity,
    );
    Ok(())
}
