//! core
//!
//! Core domain types, storage and operations for Snapline.
//!
//! # Modules
//!
//! - [`types`] - Strong types: VersionId, ContentHash, BranchName, Timestamp
//! - [`store`] - Append-only version history
//! - [`graph`] - Branch pointers and the HEAD cursor
//! - [`working`] - The editable working text
//! - [`repo`] - Repository tying the above together
//! - [`persist`] - Repository file format
//! - [`config`] - Configuration schema and loading
//! - [`lock`] - Exclusive lock on a repository file
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Every operation succeeds completely or leaves state unchanged
//! - The file format is deterministic

pub mod config;
pub mod graph;
pub mod lock;
pub mod persist;
pub mod repo;
pub mod store;
pub mod types;
pub mod working;
