//! The seam to the backing document store.
//!
//! The store itself - query execution, persistence, network transport,
//! authentication - is an external collaborator. This crate consumes it
//! through a narrow interface: one change feed per opened collection plus
//! three write primitives. [`MemoryBackend`](crate::MemoryBackend) is the
//! in-process implementation; production backends adapt a real store client
//! to this trait.

use crate::error::{FeedError, WriteError};
use futures::future::BoxFuture;
use ripple_engine::{CollectionPath, DocumentChange, DocumentKey, Fields};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Identifier of one open feed subscription.
pub type SubscriptionId = String;

/// Out-of-band delivery from an open change feed.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    /// A batch of change records, in delivery order
    Changes(Vec<DocumentChange>),
    /// The feed reported a failure; later batches may still arrive
    Error(FeedError),
}

/// Reference to the document affected by a write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub collection: CollectionPath,
    pub id: DocumentKey,
}

/// Result of a write primitive.
pub type WriteResult = std::result::Result<DocumentRef, WriteError>;

/// Narrow interface to the backing document store.
///
/// Feed deliveries for one subscription are sequential: one event is fully
/// processed before the next is dispatched. Write primitives resolve only
/// after remote acknowledgment; the resulting change records arrive back
/// through the feed.
pub trait StoreBackend: Send + Sync + 'static {
    /// Open a live change feed on `path`.
    ///
    /// Returns the event stream and a subscription id for
    /// [`unsubscribe`](StoreBackend::unsubscribe). Implementations deliver
    /// the current collection contents as an initial `added` batch.
    fn subscribe(&self, path: &str) -> (mpsc::UnboundedReceiver<FeedEvent>, SubscriptionId);

    /// Close a feed subscription. Must tolerate unknown ids.
    fn unsubscribe(&self, path: &str, subscription: &SubscriptionId);

    /// Write a new document with a store-assigned key.
    fn insert<'a>(&'a self, path: &'a str, fields: Fields) -> BoxFuture<'a, WriteResult>;

    /// Partially update an existing document. Fields absent from `partial`
    /// are left untouched.
    fn update<'a>(
        &'a self,
        path: &'a str,
        key: &'a str,
        partial: Fields,
    ) -> BoxFuture<'a, WriteResult>;

    /// Delete a document.
    fn delete<'a>(&'a self, path: &'a str, key: &'a str) -> BoxFuture<'a, WriteResult>;

    /// Redirect this backend at a local emulator. Best-effort: connectors
    /// log a failure and continue. The default implementation accepts the
    /// redirect silently.
    fn use_emulator(&self, _host: &str, _port: u16) -> std::result::Result<(), String> {
        Ok(())
    }
}
