//! # Ripple Engine
//!
//! The deterministic core of Ripple's live collection views.
//!
//! A remote document store delivers incremental change records over a feed.
//! This crate folds those records into a local keyed mirror and materializes
//! ordered snapshots from it. It is pure logic - the feed itself, the write
//! path and the reactive plumbing live in `ripple-client`.
//!
//! ## Design Principles
//!
//! - **No IO**: the engine has no knowledge of transports or runtimes
//! - **Deterministic**: the same change sequence always yields the same mirror
//! - **Testable**: pure functions and value types, no mocks needed
//!
//! ## Core Concepts
//!
//! ### Changes
//!
//! A [`DocumentChange`] is one record from the feed: a change type
//! (`added`, `modified`, `removed`), the document key, and the delivered
//! fields. Changes arrive in batches and are applied in delivery order.
//!
//! ### The Mirror
//!
//! The [`Mirror`] maps document keys to their last-known full value. Added
//! and modified changes merge field-by-field (a partial update never drops
//! fields it does not mention); removed changes delete the entry. Iteration
//! is ordered by key so snapshots are deterministic.
//!
//! ### Normalization
//!
//! The store encodes date/time fields as a tagged wire object. [`normalize`]
//! converts those to RFC 3339 strings on the way into the mirror, recursing
//! through nested objects and leaving arrays and primitives untouched.
//!
//! ## Quick Start
//!
//! ```rust
//! use ripple_engine::{DocumentChange, Mirror};
//! use serde_json::json;
//!
//! let mut mirror = Mirror::new();
//!
//! mirror.apply_batch(&[DocumentChange::added(
//!     "post-1",
//!     json!({"title": "A", "content": "x"}).as_object().cloned().unwrap(),
//! )]);
//!
//! mirror.apply_batch(&[DocumentChange::modified(
//!     "post-1",
//!     json!({"title": "B"}).as_object().cloned().unwrap(),
//! )]);
//!
//! let snapshot = mirror.snapshot();
//! assert_eq!(snapshot.len(), 1);
//! assert_eq!(snapshot[0].get("title"), Some(&json!("B")));
//! assert_eq!(snapshot[0].get("content"), Some(&json!("x")));
//! ```

pub mod change;
pub mod document;
pub mod mirror;
pub mod normalize;

// Re-export main types at crate root
pub use change::{ChangeType, DocumentChange};
pub use document::Document;
pub use mirror::Mirror;
pub use normalize::{normalize_fields, normalize_value, wire_timestamp};

/// Type aliases for clarity
pub type DocumentKey = String;
pub type CollectionPath = String;
pub type Fields = serde_json::Map<String, serde_json::Value>;
