//! Change records delivered by a collection feed.
//!
//! The feed expresses remote mutations as change records, not full snapshots.
//! A `modified` change may carry only the fields that were written
//! (partial-update semantics); the mirror is responsible for merging.

use crate::{DocumentKey, Fields};
use serde::{Deserialize, Serialize};

/// Kind of change reported for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    /// Document entered the collection (or initial feed delivery)
    Added,
    /// Existing document was written; `data` holds the written fields
    Modified,
    /// Document left the collection; `data` is empty
    Removed,
}

/// One change record from the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentChange {
    /// What happened to the document
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    /// Store-assigned document key
    pub key: DocumentKey,
    /// Delivered field values (possibly partial for `modified`)
    #[serde(default, skip_serializing_if = "Fields::is_empty")]
    pub data: Fields,
}

impl DocumentChange {
    /// Change record for a document entering the collection.
    pub fn added(key: impl Into<DocumentKey>, data: Fields) -> Self {
        Self {
            change_type: ChangeType::Added,
            key: key.into(),
            data,
        }
    }

    /// Change record for a write to an existing document.
    pub fn modified(key: impl Into<DocumentKey>, data: Fields) -> Self {
        Self {
            change_type: ChangeType::Modified,
            key: key.into(),
            data,
        }
    }

    /// Change record for a document leaving the collection.
    pub fn removed(key: impl Into<DocumentKey>) -> Self {
        Self {
            change_type: ChangeType::Removed,
            key: key.into(),
            data: Fields::new(),
        }
    }
}
