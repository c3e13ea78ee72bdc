//! core::repo
//!
//! The repository: version store, branch graph and working buffer.
//!
//! # Architecture
//!
//! A [`Repository`] is an explicitly constructed value. Command handlers
//! receive it by `&mut`, which makes every operation exclusive: a commit's
//! append and its branch-pointer update happen under the same borrow.
//!
//! Every operation either succeeds or leaves the repository exactly as it
//! was. The single exception is [`Repository::load`] on a malformed file,
//! which resets the repository to empty before parsing.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use super::graph::{
    BranchGraph, BranchListing, CommitOutcome, Cursor, GraphError, Status, SwitchOutcome,
};
use super::persist::{self, PersistError};
use super::store::{Version, VersionStore};
use super::types::{BranchName, VersionId};
use super::working::WorkingBuffer;

/// Which histories [`Repository::log`] returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogScope {
    /// The attached branch, or the detached HEAD.
    Current,
    /// Every branch, in name order.
    All,
    /// One named branch.
    Branch(BranchName),
}

/// What a history is the history of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryLabel {
    Branch(BranchName),
    Detached,
}

impl std::fmt::Display for HistoryLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryLabel::Branch(name) => write!(f, "branch {name}"),
            HistoryLabel::Detached => write!(f, "(detached)"),
        }
    }
}

/// Ancestor chain of one tip, root first.
#[derive(Debug, Clone, Serialize)]
pub struct History<'a> {
    pub label: HistoryLabel,
    pub tip: VersionId,
    pub versions: Vec<&'a Version>,
}

/// Version store, branch graph and working buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Repository {
    store: VersionStore,
    graph: BranchGraph,
    working: WorkingBuffer,
}

impl Repository {
    /// Empty repository attached to `main` at 0.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &VersionStore {
        &self.store
    }

    pub fn graph(&self) -> &BranchGraph {
        &self.graph
    }

    pub fn working(&self) -> &WorkingBuffer {
        &self.working
    }

    /// The working buffer, for edits.
    pub fn working_mut(&mut self) -> &mut WorkingBuffer {
        &mut self.working
    }

    pub fn head(&self) -> VersionId {
        self.graph.head()
    }

    pub fn status(&self) -> Status {
        self.graph.status()
    }

    pub fn list_branches(&self) -> BranchListing {
        self.graph.list_branches()
    }

    /// Snapshot the working buffer on top of HEAD.
    pub fn commit(&mut self, message: impl Into<String>) -> CommitOutcome {
        self.graph
            .commit(&mut self.store, self.working.as_str(), message)
    }

    /// Detach HEAD at `id` and load its content into the working buffer.
    ///
    /// # Errors
    ///
    /// [`GraphError::NoSuchVersion`] if `id` is 0 or unknown.
    pub fn checkout(&mut self, id: VersionId) -> Result<&Version, GraphError> {
        let version = self.graph.checkout_version(&self.store, id)?;
        self.working.set(version.content.as_str());
        Ok(version)
    }

    /// Attach HEAD to `name` and load its head into the working buffer.
    ///
    /// An empty branch, or one whose head had to be reset, clears the buffer.
    ///
    /// # Errors
    ///
    /// [`GraphError::NoSuchBranch`] if the branch does not exist.
    pub fn switch(&mut self, name: &BranchName) -> Result<SwitchOutcome, GraphError> {
        let outcome = self.graph.switch_branch(&self.store, name)?;
        match outcome {
            SwitchOutcome::Switched(head) => match self.store.get(head) {
                Some(version) => self.working.set(version.content.as_str()),
                None => self.working.clear(),
            },
            SwitchOutcome::HeadInvalid { .. } => self.working.clear(),
        }
        Ok(outcome)
    }

    /// Create a branch at `at`, or at HEAD when `at` is `None`.
    ///
    /// Returns the id the branch points at.
    pub fn create_branch(
        &mut self,
        name: BranchName,
        at: Option<VersionId>,
    ) -> Result<VersionId, GraphError> {
        let at = at.unwrap_or_else(|| self.graph.head());
        self.graph.create_branch(&self.store, name, at)?;
        Ok(at)
    }

    /// Delete a branch that HEAD is not attached to.
    pub fn delete_branch(&mut self, name: &BranchName) -> Result<VersionId, GraphError> {
        self.graph.delete_branch(name)
    }

    /// Look up a version for display.
    pub fn show(&self, id: VersionId) -> Result<&Version, GraphError> {
        self.store.get(id).ok_or(GraphError::NoSuchVersion(id))
    }

    /// Ancestor chains, root first.
    ///
    /// # Errors
    ///
    /// [`GraphError::NoSuchBranch`] for an unknown [`LogScope::Branch`].
    pub fn log(&self, scope: &LogScope) -> Result<Vec<History<'_>>, GraphError> {
        let histories = match scope {
            LogScope::Current => {
                let label = match self.graph.cursor() {
                    Cursor::Attached(name) => HistoryLabel::Branch(name.clone()),
                    Cursor::Detached(_) => HistoryLabel::Detached,
                };
                vec![self.history(label, self.graph.head())]
            }
            LogScope::All => self
                .graph
                .branches()
                .map(|(name, head)| self.history(HistoryLabel::Branch(name.clone()), head))
                .collect(),
            LogScope::Branch(name) => {
                let head = self
                    .graph
                    .branch_head(name)
                    .ok_or_else(|| GraphError::NoSuchBranch(name.clone()))?;
                vec![self.history(HistoryLabel::Branch(name.clone()), head)]
            }
        };
        Ok(histories)
    }

    fn history(&self, label: HistoryLabel, tip: VersionId) -> History<'_> {
        let versions = self
            .store
            .ancestor_chain(tip)
            .into_iter()
            .rev()
            .filter_map(|id| self.store.get(id))
            .collect();
        History {
            label,
            tip,
            versions,
        }
    }

    /// Render the repository file contents.
    pub fn to_file_string(&self) -> String {
        persist::encode(&self.store, &self.graph)
    }

    /// Write the repository file.
    pub fn save(&self, path: &Path) -> Result<(), PersistError> {
        persist::write_file_atomic(path, &self.to_file_string())?;
        info!(path = %path.display(), versions = self.store.len(), "saved repository");
        Ok(())
    }

    /// Replace this repository with the contents of `path`.
    ///
    /// An unreadable file leaves the repository untouched. Once the file is
    /// read, the repository is reset to empty first, so a malformed file
    /// leaves an empty repository rather than a mix of old and new state.
    pub fn load(&mut self, path: &Path) -> Result<(), PersistError> {
        let bytes = persist::read_file(path)?;
        self.load_bytes(&bytes)?;
        info!(path = %path.display(), versions = self.store.len(), "loaded repository");
        Ok(())
    }

    /// [`load`](Self::load) from in-memory file contents.
    pub fn load_str(&mut self, text: &str) -> Result<(), PersistError> {
        self.load_bytes(text.as_bytes())
    }

    /// [`load`](Self::load) from raw file bytes. Text that is not UTF-8 is
    /// malformed and leaves an empty repository.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<(), PersistError> {
        *self = Self::new();
        let text = persist::utf8_text(bytes)?;
        let (store, graph) = persist::decode(text)?;
        self.store = store;
        self.graph = graph;

        let head = self.graph.head();
        match self.store.get(head) {
            Some(version) => self.working.set(version.content.as_str()),
            None => self.working.clear(),
        }
        debug!(%head, "working buffer restored from head");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> BranchName {
        BranchName::new(s).unwrap()
    }

    fn id(raw: u64) -> VersionId {
        VersionId::new(raw)
    }

    fn commit(repo: &mut Repository, content: &str, message: &str) -> CommitOutcome {
        repo.working_mut().set(content);
        repo.commit(message)
    }

    #[test]
    fn branch_scenario() {
        let mut repo = Repository::new();

        assert_eq!(commit(&mut repo, "A", "msg1"), CommitOutcome::Created(id(1)));
        assert_eq!(repo.show(id(1)).unwrap().parent, id(0));

        repo.create_branch(name("feat"), Some(id(1))).unwrap();
        repo.switch(&name("feat")).unwrap();
        assert_eq!(commit(&mut repo, "AB", "msg2"), CommitOutcome::Created(id(2)));
        assert_eq!(repo.show(id(2)).unwrap().parent, id(1));
        assert_eq!(repo.graph().branch_head(&name("feat")), Some(id(2)));
        assert_eq!(repo.graph().branch_head(&name("main")), Some(id(1)));

        repo.switch(&name("main")).unwrap();
        assert_eq!(repo.working().as_str(), "A");

        let branches_before = repo.list_branches().branches;
        repo.checkout(id(2)).unwrap();
        assert_eq!(repo.working().as_str(), "AB");
        assert!(repo.status().detached);
        assert_eq!(repo.list_branches().branches, branches_before);
    }

    #[test]
    fn switch_to_empty_branch_clears_working() {
        let mut repo = Repository::new();
        commit(&mut repo, "A", "");
        repo.create_branch(name("empty"), Some(VersionId::ROOT))
            .unwrap();

        repo.switch(&name("empty")).unwrap();
        assert!(repo.working().is_empty());
        assert_eq!(repo.head(), VersionId::ROOT);
    }

    #[test]
    fn create_branch_defaults_to_head() {
        let mut repo = Repository::new();
        commit(&mut repo, "A", "");
        commit(&mut repo, "B", "");
        assert_eq!(repo.create_branch(name("here"), None).unwrap(), id(2));
    }

    #[test]
    fn failed_operations_leave_state_unchanged() {
        let mut repo = Repository::new();
        commit(&mut repo, "A", "");
        repo.working_mut().set("edited");
        let before = repo.clone();

        assert!(repo.checkout(id(9)).is_err());
        assert!(repo.switch(&name("nope")).is_err());
        assert!(repo.create_branch(name("main"), None).is_err());
        assert!(repo.delete_branch(&name("main")).is_err());

        assert_eq!(repo, before);
    }

    #[test]
    fn log_current_is_root_first() {
        let mut repo = Repository::new();
        commit(&mut repo, "A", "one");
        commit(&mut repo, "B", "two");

        let histories = repo.log(&LogScope::Current).unwrap();
        assert_eq!(histories.len(), 1);
        assert_eq!(histories[0].label, HistoryLabel::Branch(name("main")));
        let ids: Vec<_> = histories[0].versions.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![id(1), id(2)]);
    }

    #[test]
    fn log_detached_and_all() {
        let mut repo = Repository::new();
        commit(&mut repo, "A", "");
        repo.create_branch(name("empty"), Some(VersionId::ROOT))
            .unwrap();
        repo.checkout(id(1)).unwrap();

        let current = repo.log(&LogScope::Current).unwrap();
        assert_eq!(current[0].label, HistoryLabel::Detached);

        let all = repo.log(&LogScope::All).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].label, HistoryLabel::Branch(name("empty")));
        assert!(all[0].versions.is_empty());

        assert!(matches!(
            repo.log(&LogScope::Branch(name("ghost"))),
            Err(GraphError::NoSuchBranch(_))
        ));
    }

    #[test]
    fn load_str_restores_working_from_head() {
        let mut repo = Repository::new();
        commit(&mut repo, "A", "");
        commit(&mut repo, "B", "");
        repo.checkout(id(1)).unwrap();
        let text = repo.to_file_string();

        let mut loaded = Repository::new();
        loaded.load_str(&text).unwrap();
        assert_eq!(loaded.working().as_str(), "A");
        assert_eq!(loaded, repo);
    }

    #[test]
    fn malformed_load_resets_to_empty() {
        let mut repo = Repository::new();
        commit(&mut repo, "A", "");

        assert!(repo.load_str("count 1\nid 1\n").is_err());
        assert_eq!(repo, Repository::new());
    }

    #[test]
    fn non_utf8_load_resets_to_empty() {
        let mut repo = Repository::new();
        commit(&mut repo, "A", "");
        repo.working_mut().set("prior");

        let err = repo.load_bytes(b"count 1\nid 1\nparent 0\n\xff").unwrap_err();

        assert!(matches!(err, PersistError::Malformed { line: 4, .. }));
        assert_eq!(repo, Repository::new());
        assert!(repo.working().is_empty());
    }
}
