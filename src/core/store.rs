//! core::store
//!
//! Append-only history of full-content snapshots.
//!
//! # Architecture
//!
//! The store is a vector of [`Version`] records where the version with id
//! `i` lives at index `i - 1`. Lookups are O(1) and ids are never reused.
//!
//! # Invariants
//!
//! - Ids are sequential starting at 1, in append order
//! - A version's parent is 0 or an id appended earlier, so parent chains
//!   always terminate (the history is a forest with no cycles)
//! - Versions are never mutated or removed after append

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use super::types::{ContentHash, Timestamp, VersionId};

/// An immutable snapshot of the working buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Version {
    /// Sequential id, starting at 1.
    pub id: VersionId,
    /// Version this was committed on top of, or 0 for a root.
    pub parent: VersionId,
    /// Creation instant.
    pub timestamp: Timestamp,
    /// FNV-1a fingerprint of `content`.
    pub content_hash: ContentHash,
    /// Committer annotation, possibly empty.
    pub message: String,
    /// Full working buffer at commit time.
    pub content: String,
}

/// Result of [`VersionStore::append`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// A new version was appended.
    Created(VersionId),
    /// Content matched the most recently appended version; carries that
    /// version's id.
    Unchanged(VersionId),
}

impl AppendOutcome {
    /// The id the append resolved to.
    pub fn id(self) -> VersionId {
        match self {
            AppendOutcome::Created(id) | AppendOutcome::Unchanged(id) => id,
        }
    }
}

/// Errors when rebuilding a store from persisted records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("version id {found} out of sequence, expected {expected}")]
    OutOfSequence {
        expected: VersionId,
        found: VersionId,
    },

    #[error("version {id} has parent {parent}, which does not precede it")]
    DanglingParent { id: VersionId, parent: VersionId },
}

/// Ordered, 1-indexed sequence of versions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionStore {
    versions: Vec<Version>,
}

impl VersionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a snapshot parented at `parent`.
    ///
    /// If the store is non-empty and the most recently appended version has
    /// the same content hash, nothing is appended and the latest id is
    /// returned as [`AppendOutcome::Unchanged`]. The comparison is against
    /// the globally last version, not against `parent`.
    pub fn append(
        &mut self,
        parent: VersionId,
        content: &str,
        message: impl Into<String>,
    ) -> AppendOutcome {
        let content_hash = ContentHash::of(content);

        if let Some(latest) = self.versions.last() {
            if latest.content_hash == content_hash {
                debug!(latest = %latest.id, hash = %content_hash, "no content change");
                return AppendOutcome::Unchanged(latest.id);
            }
        }

        let id = self.next_id();
        self.versions.push(Version {
            id,
            parent,
            timestamp: Timestamp::now(),
            content_hash,
            message: message.into(),
            content: content.to_string(),
        });
        debug!(%id, %parent, hash = %content_hash, "appended version");
        AppendOutcome::Created(id)
    }

    /// Append an already-built record, as read back from storage.
    ///
    /// # Errors
    ///
    /// - [`StoreError::OutOfSequence`] if `version.id` is not the next id
    /// - [`StoreError::DanglingParent`] if the parent is not an earlier id
    pub fn restore(&mut self, version: Version) -> Result<(), StoreError> {
        let expected = self.next_id();
        if version.id != expected {
            return Err(StoreError::OutOfSequence {
                expected,
                found: version.id,
            });
        }
        if version.parent >= version.id {
            return Err(StoreError::DanglingParent {
                id: version.id,
                parent: version.parent,
            });
        }
        self.versions.push(version);
        Ok(())
    }

    /// Look up a version. Returns `None` for 0 or ids past the end.
    pub fn get(&self, id: VersionId) -> Option<&Version> {
        let index = usize::try_from(id.get()).ok()?.checked_sub(1)?;
        self.versions.get(index)
    }

    /// Check whether `id` names a stored version.
    pub fn contains(&self, id: VersionId) -> bool {
        self.get(id).is_some()
    }

    /// Ids from `tip` back to its root, tip first.
    ///
    /// Stops at 0 or at an id the store does not know.
    ///
    /// # Example
    ///
    /// ```
    /// use snapline::core::store::VersionStore;
    /// use snapline::core::types::VersionId;
    ///
    /// let mut store = VersionStore::new();
    /// let a = store.append(VersionId::ROOT, "a", "").id();
    /// let b = store.append(a, "b", "").id();
    /// let c = store.append(a, "c", "").id();
    ///
    /// assert_eq!(store.ancestor_chain(c), vec![c, a]);
    /// assert_eq!(store.ancestor_chain(b), vec![b, a]);
    /// assert!(store.ancestor_chain(VersionId::ROOT).is_empty());
    /// ```
    pub fn ancestor_chain(&self, tip: VersionId) -> Vec<VersionId> {
        let mut chain = Vec::new();
        let mut current = tip;

        while !current.is_root() {
            let Some(version) = self.get(current) else {
                break;
            };
            chain.push(current);
            current = version.parent;
        }

        chain
    }

    /// The most recently appended version.
    pub fn latest(&self) -> Option<&Version> {
        self.versions.last()
    }

    /// Number of versions.
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Check if no version has been appended.
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Iterate versions in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Version> {
        self.versions.iter()
    }

    fn next_id(&self) -> VersionId {
        VersionId::new(self.versions.len() as u64 + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> VersionId {
        VersionId::new(raw)
    }

    #[test]
    fn append_assigns_sequential_ids() {
        let mut store = VersionStore::new();
        assert_eq!(store.append(id(0), "a", "one"), AppendOutcome::Created(id(1)));
        assert_eq!(store.append(id(1), "b", "two"), AppendOutcome::Created(id(2)));
        assert_eq!(store.len(), 2);

        let v = store.get(id(2)).unwrap();
        assert_eq!(v.parent, id(1));
        assert_eq!(v.message, "two");
        assert_eq!(v.content, "b");
        assert_eq!(v.content_hash, ContentHash::of("b"));
    }

    #[test]
    fn first_append_of_empty_content_is_created() {
        let mut store = VersionStore::new();
        assert_eq!(store.append(id(0), "", ""), AppendOutcome::Created(id(1)));
    }

    #[test]
    fn duplicate_of_latest_is_unchanged() {
        let mut store = VersionStore::new();
        store.append(id(0), "a", "");
        store.append(id(1), "b", "");

        assert_eq!(store.append(id(2), "b", "again"), AppendOutcome::Unchanged(id(2)));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn dedup_only_looks_at_latest_version() {
        let mut store = VersionStore::new();
        store.append(id(0), "a", "");
        store.append(id(1), "b", "");

        // Same content as version 1, parented at 1: not the latest, so appended.
        assert_eq!(store.append(id(1), "a", ""), AppendOutcome::Created(id(3)));

        // Different from parent 1 but equal to latest (3): rejected.
        assert_eq!(store.append(id(2), "a", ""), AppendOutcome::Unchanged(id(3)));
    }

    #[test]
    fn get_rejects_zero_and_out_of_range() {
        let mut store = VersionStore::new();
        store.append(id(0), "a", "");

        assert!(store.get(id(0)).is_none());
        assert!(store.get(id(2)).is_none());
        assert!(store.get(id(u64::MAX)).is_none());
        assert!(store.contains(id(1)));
    }

    #[test]
    fn ancestor_chain_walks_to_root() {
        let mut store = VersionStore::new();
        store.append(id(0), "a", "");
        store.append(id(1), "b", "");
        store.append(id(2), "c", "");
        store.append(id(1), "d", "");

        assert_eq!(store.ancestor_chain(id(3)), vec![id(3), id(2), id(1)]);
        assert_eq!(store.ancestor_chain(id(4)), vec![id(4), id(1)]);
    }

    #[test]
    fn ancestor_chain_of_unknown_tip_is_empty() {
        let store = VersionStore::new();
        assert!(store.ancestor_chain(id(9)).is_empty());
    }

    #[test]
    fn restore_enforces_sequence_and_parent_order() {
        let mut source = VersionStore::new();
        source.append(id(0), "a", "");
        source.append(id(1), "b", "");
        let records: Vec<_> = source.iter().cloned().collect();

        let mut store = VersionStore::new();
        assert_eq!(
            store.restore(records[1].clone()),
            Err(StoreError::OutOfSequence {
                expected: id(1),
                found: id(2)
            })
        );

        store.restore(records[0].clone()).unwrap();
        store.restore(records[1].clone()).unwrap();
        assert_eq!(store, source);

        let mut bad = records[0].clone();
        bad.id = id(3);
        bad.parent = id(3);
        assert_eq!(
            store.restore(bad),
            Err(StoreError::DanglingParent {
                id: id(3),
                parent: id(3)
            })
        );
    }

    #[test]
    fn latest_tracks_last_append() {
        let mut store = VersionStore::new();
        assert!(store.latest().is_none());
        store.append(id(0), "x", "");
        assert_eq!(store.latest().map(|v| v.id), Some(id(1)));
    }
}
