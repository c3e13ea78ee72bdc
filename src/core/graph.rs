//! core::graph
//!
//! Branch pointers and the HEAD cursor.
//!
//! # Architecture
//!
//! The branch graph maps branch names to version ids and keeps a cursor
//! that is either attached to a branch or detached at a version id:
//!
//! ```text
//!   Attached(name) --checkout(id)--> Detached(id)
//!   Detached(id)   --switch(name)--> Attached(name)
//! ```
//!
//! Checkout and switch are accepted from either state, including
//! re-entering the branch that is already attached. `commit` keeps the
//! state and advances the attached branch only.
//! Creating and deleting branches never moves the cursor.
//!
//! # Invariants
//!
//! - The branch map is never empty (`main` at 0 is seeded on creation)
//! - While attached, the current branch exists in the map
//! - The attached branch cannot be deleted
//!
//! Operations that need to resolve ids borrow the [`VersionStore`]; the
//! caller owns both and mutates them together through `&mut`, so an append
//! and the matching pointer update can never be observed apart.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::store::{AppendOutcome, Version, VersionStore};
use super::types::{BranchName, VersionId};

/// Errors from branch graph operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("no such version: {0}")]
    NoSuchVersion(VersionId),

    #[error("no such branch: {0}")]
    NoSuchBranch(BranchName),

    #[error("branch already exists: {0}")]
    BranchExists(BranchName),

    #[error("cannot delete current branch: {0}")]
    CannotDeleteCurrent(BranchName),
}

/// Result of [`BranchGraph::commit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// A new version was created and HEAD moved to it.
    Created(VersionId),
    /// Content matched the latest version; HEAD did not move.
    Unchanged(VersionId),
}

impl CommitOutcome {
    /// HEAD after the commit.
    pub fn id(self) -> VersionId {
        match self {
            CommitOutcome::Created(id) | CommitOutcome::Unchanged(id) => id,
        }
    }
}

/// Result of [`BranchGraph::switch_branch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// Attached to the branch; HEAD is its head (0 for an empty branch).
    Switched(VersionId),
    /// The branch pointed at an unknown version and was reset to 0.
    HeadInvalid { stale: VersionId },
}

/// Borrowed view of the cursor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor<'a> {
    Attached(&'a BranchName),
    Detached(VersionId),
}

/// Read-only projection of the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    pub head: VersionId,
    pub current_branch: BranchName,
    pub detached: bool,
}

/// One line of a branch listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchEntry {
    pub name: BranchName,
    pub head: VersionId,
    /// Set only for the attached branch.
    pub current: bool,
}

/// All branches in name order, plus the detached HEAD if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchListing {
    pub branches: Vec<BranchEntry>,
    pub detached_head: Option<VersionId>,
}

/// Branch name to head id mapping plus the HEAD cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchGraph {
    branches: BTreeMap<BranchName, VersionId>,
    /// Branch the cursor is (or was last) attached to.
    current_branch: BranchName,
    /// `Some(id)` while detached.
    detached: Option<VersionId>,
}

impl Default for BranchGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl BranchGraph {
    /// Create a graph attached to `main` at 0.
    pub fn new() -> Self {
        let main = BranchName::main();
        let mut branches = BTreeMap::new();
        branches.insert(main.clone(), VersionId::ROOT);
        Self {
            branches,
            current_branch: main,
            detached: None,
        }
    }

    /// Rebuild a graph from persisted fields.
    ///
    /// An empty map gets `main` at 0. When attached to a branch missing from
    /// the map, that branch is recreated at `head`. While attached, HEAD is
    /// the branch's head; if that version is unknown the branch is reset
    /// to 0. Other branches with unknown heads are left for
    /// [`switch_branch`](Self::switch_branch) to recover.
    ///
    /// # Errors
    ///
    /// [`GraphError::NoSuchVersion`] if detached at an unknown version.
    pub fn from_parts(
        store: &VersionStore,
        mut branches: BTreeMap<BranchName, VersionId>,
        current_branch: BranchName,
        detached: bool,
        head: VersionId,
    ) -> Result<Self, GraphError> {
        if branches.is_empty() {
            branches.insert(BranchName::main(), VersionId::ROOT);
        }

        if detached {
            if !head.is_root() && !store.contains(head) {
                return Err(GraphError::NoSuchVersion(head));
            }
        } else {
            let branch_head = *branches.entry(current_branch.clone()).or_insert_with(|| {
                warn!(branch = %current_branch, %head, "current branch missing, recreating at head");
                head
            });
            if !branch_head.is_root() && !store.contains(branch_head) {
                warn!(branch = %current_branch, stale = %branch_head, "branch head invalid, resetting to 0");
                branches.insert(current_branch.clone(), VersionId::ROOT);
            } else if branch_head != head {
                warn!(branch = %current_branch, %head, %branch_head, "stored head disagrees with branch, using branch");
            }
        }

        Ok(Self {
            branches,
            current_branch,
            detached: detached.then_some(head),
        })
    }

    /// The version the working buffer reflects.
    pub fn head(&self) -> VersionId {
        match self.detached {
            Some(id) => id,
            None => self
                .branches
                .get(&self.current_branch)
                .copied()
                .unwrap_or(VersionId::ROOT),
        }
    }

    /// Current cursor state.
    pub fn cursor(&self) -> Cursor<'_> {
        match self.detached {
            Some(id) => Cursor::Detached(id),
            None => Cursor::Attached(&self.current_branch),
        }
    }

    /// Branch the cursor is attached to, or was last attached to.
    pub fn current_branch(&self) -> &BranchName {
        &self.current_branch
    }

    pub fn is_detached(&self) -> bool {
        self.detached.is_some()
    }

    /// Head of a branch, if it exists.
    pub fn branch_head(&self, name: &BranchName) -> Option<VersionId> {
        self.branches.get(name).copied()
    }

    /// All branches in name order.
    pub fn branches(&self) -> impl Iterator<Item = (&BranchName, VersionId)> {
        self.branches.iter().map(|(name, head)| (name, *head))
    }

    /// Commit `working` on top of HEAD.
    ///
    /// While attached, the current branch advances to the new version. While
    /// detached, HEAD moves but no branch does. A no-op commit reports the
    /// prior HEAD.
    pub fn commit(
        &mut self,
        store: &mut VersionStore,
        working: &str,
        message: impl Into<String>,
    ) -> CommitOutcome {
        let head = self.head();
        match store.append(head, working, message) {
            AppendOutcome::Unchanged(_) => CommitOutcome::Unchanged(head),
            AppendOutcome::Created(id) => {
                match self.detached.as_mut() {
                    Some(detached) => *detached = id,
                    None => {
                        self.branches.insert(self.current_branch.clone(), id);
                        debug!(branch = %self.current_branch, %id, "advanced branch");
                    }
                }
                CommitOutcome::Created(id)
            }
        }
    }

    /// Detach HEAD at `id`.
    ///
    /// Returns the version so the caller can copy its content into the
    /// working buffer.
    ///
    /// # Errors
    ///
    /// [`GraphError::NoSuchVersion`] if `id` is 0 or unknown.
    pub fn checkout_version<'s>(
        &mut self,
        store: &'s VersionStore,
        id: VersionId,
    ) -> Result<&'s Version, GraphError> {
        let version = store.get(id).ok_or(GraphError::NoSuchVersion(id))?;
        self.detached = Some(id);
        debug!(%id, "detached HEAD");
        Ok(version)
    }

    /// Attach HEAD to `name`.
    ///
    /// # Errors
    ///
    /// [`GraphError::NoSuchBranch`] if the branch does not exist.
    pub fn switch_branch(
        &mut self,
        store: &VersionStore,
        name: &BranchName,
    ) -> Result<SwitchOutcome, GraphError> {
        let head = self
            .branch_head(name)
            .ok_or_else(|| GraphError::NoSuchBranch(name.clone()))?;

        self.current_branch = name.clone();
        self.detached = None;

        if !head.is_root() && !store.contains(head) {
            warn!(branch = %name, stale = %head, "branch head invalid, resetting to 0");
            self.branches.insert(name.clone(), VersionId::ROOT);
            return Ok(SwitchOutcome::HeadInvalid { stale: head });
        }

        debug!(branch = %name, %head, "switched branch");
        Ok(SwitchOutcome::Switched(head))
    }

    /// Create branch `name` pointing at `at` (0 for an empty branch).
    ///
    /// # Errors
    ///
    /// - [`GraphError::BranchExists`] if the name is taken
    /// - [`GraphError::NoSuchVersion`] if `at` is non-zero and unknown
    pub fn create_branch(
        &mut self,
        store: &VersionStore,
        name: BranchName,
        at: VersionId,
    ) -> Result<(), GraphError> {
        if self.branches.contains_key(&name) {
            return Err(GraphError::BranchExists(name));
        }
        if !at.is_root() && !store.contains(at) {
            return Err(GraphError::NoSuchVersion(at));
        }
        debug!(branch = %name, %at, "created branch");
        self.branches.insert(name, at);
        Ok(())
    }

    /// Delete branch `name`, returning the head it pointed at.
    ///
    /// # Errors
    ///
    /// - [`GraphError::NoSuchBranch`] if the branch does not exist
    /// - [`GraphError::CannotDeleteCurrent`] if HEAD is attached to it
    pub fn delete_branch(&mut self, name: &BranchName) -> Result<VersionId, GraphError> {
        if !self.branches.contains_key(name) {
            return Err(GraphError::NoSuchBranch(name.clone()));
        }
        if !self.is_detached() && name == &self.current_branch {
            return Err(GraphError::CannotDeleteCurrent(name.clone()));
        }
        let head = self.branches.remove(name).unwrap_or_default();
        if self.branches.is_empty() {
            // Only reachable while detached with a single branch left.
            self.branches.insert(BranchName::main(), VersionId::ROOT);
        }
        debug!(branch = %name, %head, "deleted branch");
        Ok(head)
    }

    /// Read-only cursor projection.
    pub fn status(&self) -> Status {
        Status {
            head: self.head(),
            current_branch: self.current_branch.clone(),
            detached: self.is_detached(),
        }
    }

    /// Read-only branch listing.
    pub fn list_branches(&self) -> BranchListing {
        let attached = match self.cursor() {
            Cursor::Attached(name) => Some(name),
            Cursor::Detached(_) => None,
        };
        BranchListing {
            branches: self
                .branches()
                .map(|(name, head)| BranchEntry {
                    name: name.clone(),
                    head,
                    current: Some(name) == attached,
                })
                .collect(),
            detached_head: self.detached,
        }
    }
}
