//! Documents as exposed to consumers.

use crate::{DocumentKey, Fields};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A document: the store-assigned key plus the last-known full set of
/// fields, merged into one record.
///
/// Serializes flat, so a document with fields `{"title": "A"}` becomes
/// `{"id": "...", "title": "A"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Store-assigned document key
    pub id: DocumentKey,
    /// Current field values
    #[serde(flatten)]
    pub fields: Fields,
}

impl Document {
    /// Create a document from a key and its fields.
    pub fn new(id: impl Into<DocumentKey>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Get a field value by name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Merge delivered fields into this document.
    ///
    /// Partial-update semantics: fields present in `incoming` overwrite,
    /// fields absent from it are retained.
    pub fn merge_fields(&mut self, incoming: Fields) {
        for (name, value) in incoming {
            self.fields.insert(name, value);
        }
    }
}
