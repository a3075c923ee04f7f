//! # Ripple Client
//!
//! Live, mutation-tolerant local views of remote document collections.
//!
//! A consumer connects once, opens a collection, and receives an
//! always-current observable snapshot that tracks server-side inserts,
//! updates and deletes. The change-fold itself lives in `ripple-engine`;
//! this crate adds the runtime around it:
//!
//! - [`connect`] - one shared [`StoreHandle`] per backing-store identity,
//!   with optional emulator redirection
//! - [`open_collection`] - opens a change feed and returns a
//!   [`CollectionView`]: observable snapshot and error cells plus
//!   write-through `insert`/`update`/`remove`
//! - [`Scope`] - explicit subscription ownership; disposing the scope tears
//!   the feed down exactly once
//! - [`StoreBackend`] - the narrow seam to the real store;
//!   [`MemoryBackend`] is the in-process implementation
//!
//! Mutations never touch the local mirror. A write is acknowledged
//! remotely, its change record arrives back through the feed, and only then
//! does the snapshot move - so every observer converges on what the store
//! actually holds.
//!
//! ## Quick Start
//!
//! ```rust
//! use ripple_client::{connect, open_collection, Credentials, MemoryBackend, Scope, StoreConfig};
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let config = StoreConfig::new(Credentials::new("demo-project", "demo-key"));
//! let handle = connect(config, MemoryBackend::new_shared()).unwrap();
//!
//! let scope = Scope::new();
//! let posts = open_collection(&handle, "posts", &scope).unwrap();
//!
//! let mut snapshots = posts.watch_snapshot();
//! posts
//!     .insert(json!({"title": "Hello"}).as_object().cloned().unwrap())
//!     .await
//!     .unwrap();
//!
//! snapshots.changed().await.unwrap();
//! assert_eq!(posts.snapshot()[0].get("title"), Some(&json!("Hello")));
//!
//! scope.dispose();
//! # }
//! ```

pub mod backend;
pub mod collection;
pub mod config;
pub mod error;
pub mod handle;
pub mod memory;
pub mod scope;

pub use backend::{DocumentRef, FeedEvent, StoreBackend, SubscriptionId, WriteResult};
pub use collection::{open_collection, CollectionView};
pub use config::{ConfigError, Credentials, EmulatorConfig, StoreConfig};
pub use error::{ContextError, Error, FeedError, Result, WriteError};
pub use handle::{connect, StoreHandle};
pub use memory::MemoryBackend;
pub use scope::Scope;

// Engine types that appear in this crate's API surface.
pub use ripple_engine::{
    wire_timestamp, ChangeType, CollectionPath, Document, DocumentChange, DocumentKey, Fields,
};
