//! Snapline - a text versioning tool with named branches
//!
//! Snapline keeps every committed snapshot of a text in an append-only
//! history. Each snapshot records its parent, so branches are just named
//! pointers into that history and HEAD can be attached to a branch or
//! detached at any version.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface and interactive shell
//! - [`core`] - Domain types, version store, branch graph, persistence
//! - [`ui`] - Output formatting
//! - [`logging`] - Diagnostic output setup
//!
//! # Correctness Invariants
//!
//! 1. Version ids are dense, start at 1, and never change once assigned
//! 2. Every parent is 0 or a smaller id, so history is acyclic
//! 3. A failed command leaves the repository exactly as it was
//! 4. Saving a loaded repository reproduces the file byte for byte

pub mod cli;
pub mod core;
pub mod logging;
pub mod ui;
