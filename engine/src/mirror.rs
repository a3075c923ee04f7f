//! Mirror - the local keyed projection of a remote collection.
//!
//! The mirror is built by folding change batches in delivery order. It has
//! exactly one writer (the feed-delivery path); readers only ever see
//! materialized snapshots.

use crate::{normalize_fields, ChangeType, Document, DocumentChange, DocumentKey};
use std::collections::BTreeMap;

/// Keyed mirror of a remote collection.
///
/// Entries are keyed by document key and ordered ascending by key, so
/// [`Mirror::snapshot`] is deterministic regardless of delivery order.
#[derive(Debug, Clone, Default)]
pub struct Mirror {
    entries: BTreeMap<DocumentKey, Document>,
}

impl Mirror {
    /// Create an empty mirror.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one delivered batch into the mirror, in delivery order.
    ///
    /// `added` and `modified` both merge: if the document exists, delivered
    /// fields overwrite and undelivered fields are retained; otherwise a new
    /// entry is created. `removed` deletes the entry, silently no-oping if
    /// the key is absent.
    pub fn apply_batch(&mut self, changes: &[DocumentChange]) {
        for change in changes {
            self.apply(change);
        }
    }

    fn apply(&mut self, change: &DocumentChange) {
        match change.change_type {
            ChangeType::Added | ChangeType::Modified => {
                let normalized = normalize_fields(change.data.clone());
                match self.entries.get_mut(&change.key) {
                    Some(existing) => existing.merge_fields(normalized),
                    None => {
                        self.entries.insert(
                            change.key.clone(),
                            Document::new(change.key.clone(), normalized),
                        );
                    }
                }
            }
            ChangeType::Removed => {
                self.entries.remove(&change.key);
            }
        }
    }

    /// Materialize the current values as an ordered snapshot.
    pub fn snapshot(&self) -> Vec<Document> {
        self.entries.values().cloned().collect()
    }

    /// Get a document by key.
    pub fn get(&self, key: &str) -> Option<&Document> {
        self.entries.get(key)
    }

    /// Check whether a key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of documents currently mirrored.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the mirror is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the mirrored keys in snapshot order.
    pub fn keys(&self) -> impl Iterator<Item = &DocumentKey> {
        self.entries.keys()
    }
}
