//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Renderers build the text for each command and return it as a `String`,
//! so the exact layout is testable. The print helpers decide where it goes
//! and respect the quiet flag. When `--json` is enabled, read-only commands
//! emit machine-readable JSON instead.

use std::fmt::{Display, Write as _};

use serde::Serialize;

use crate::core::graph::{BranchListing, CommitOutcome, Status};
use crate::core::repo::History;
use crate::core::store::VersionStore;
use crate::core::types::Timestamp;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print requested data. Shown even in quiet mode.
pub fn data(message: impl Display) {
    println!("{}", message);
}

/// Print a value as pretty JSON.
pub fn json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Render a timestamp as `YYYY-MM-DD HH:MM:SS`.
pub fn format_time(timestamp: Timestamp, utc: bool) -> String {
    if utc {
        timestamp.format_utc()
    } else {
        timestamp.format_local()
    }
}

/// Result line for `commit`.
pub fn render_commit(outcome: CommitOutcome, status: &Status) -> String {
    match outcome {
        CommitOutcome::Unchanged(_) => "no content change".to_string(),
        CommitOutcome::Created(id) if status.detached => format!("Committed as {id} (detached)"),
        CommitOutcome::Created(id) => {
            format!("Committed as {id} on branch {}", status.current_branch)
        }
    }
}

/// Render one history block: a header, then one line per version, root first.
///
/// The chain's tip is marked `(HEAD)`.
pub fn render_history(history: &History<'_>, utc: bool) -> String {
    let mut out = String::new();
    let _ = write!(out, "=== {} ===", history.label);
    for version in &history.versions {
        let mark = if version.id == history.tip { " (HEAD)" } else { "" };
        let _ = write!(
            out,
            "\nid {}{}  parent {}  hash {}  time {}  msg: {}",
            version.id,
            mark,
            version.parent,
            version.content_hash,
            format_time(version.timestamp, utc),
            version.message
        );
    }
    if history.versions.is_empty() {
        out.push_str("\n(no commits)");
    }
    out
}

/// Render the branch listing. The store supplies hash and message for
/// branches whose head is a known version.
pub fn render_branches(listing: &BranchListing, store: &VersionStore) -> String {
    let mut lines = Vec::with_capacity(listing.branches.len() + 1);
    for entry in &listing.branches {
        let marker = if entry.current { "* " } else { "  " };
        let mut line = format!("{marker}{} -> {}", entry.name, entry.head);
        if let Some(version) = store.get(entry.head) {
            let _ = write!(
                line,
                "  (hash {} msg: {})",
                version.content_hash, version.message
            );
        }
        lines.push(line);
    }
    if let Some(head) = listing.detached_head {
        lines.push(format!("* (detached) HEAD -> {head}"));
    }
    lines.join("\n")
}

/// Render the `status` line.
pub fn render_status(status: &Status) -> String {
    if status.detached {
        format!("HEAD: {} (detached)", status.head)
    } else {
        format!("HEAD: {} on branch '{}'", status.head, status.current_branch)
    }
}
