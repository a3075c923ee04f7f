//! In-memory store backend.
//!
//! Stands in for the real document store in tests and local development,
//! playing the role of a local emulator: writes land in in-process storage
//! and are broadcast to feed subscribers as change records. Documents are
//! stored in the wire representation, so temporal fields written via
//! [`wire_timestamp`](ripple_engine::wire_timestamp) come back through the
//! feed exactly as a remote store would deliver them.

use crate::backend::{DocumentRef, FeedEvent, StoreBackend, SubscriptionId, WriteResult};
use crate::error::{FeedError, WriteError};
use dashmap::DashMap;
use futures::future::BoxFuture;
use ripple_engine::{CollectionPath, DocumentChange, DocumentKey, Fields};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Debug)]
struct Subscriber {
    id: SubscriptionId,
    sender: mpsc::UnboundedSender<FeedEvent>,
}

/// In-process document store with live change feeds.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    /// Documents per collection path
    collections: DashMap<CollectionPath, HashMap<DocumentKey, Fields>>,
    /// Feed subscribers per collection path
    subscribers: DashMap<CollectionPath, Vec<Subscriber>>,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty backend wrapped in `Arc` for sharing.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Number of documents currently stored under `path`.
    pub fn document_count(&self, path: &str) -> usize {
        self.collections.get(path).map_or(0, |docs| docs.len())
    }

    /// Deliver a feed failure to all subscribers of `path`.
    ///
    /// Emulates a transport or permission failure on an open feed; the feed
    /// stays open and later writes are still delivered.
    pub fn emit_error(&self, path: &str, error: FeedError) {
        self.broadcast(path, FeedEvent::Error(error));
    }

    fn broadcast(&self, path: &str, event: FeedEvent) {
        let Some(subscribers) = self.subscribers.get(path) else {
            return;
        };
        let mut delivered = 0;
        for subscriber in subscribers.iter() {
            if subscriber.sender.send(event.clone()).is_ok() {
                delivered += 1;
            }
        }
        tracing::debug!(path = %path, recipients = delivered, "broadcast feed event");
    }
}

impl StoreBackend for MemoryBackend {
    fn subscribe(&self, path: &str) -> (mpsc::UnboundedReceiver<FeedEvent>, SubscriptionId) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = uuid::Uuid::new_v4().to_string();

        // Initial delivery: everything already stored, as added changes.
        if let Some(docs) = self.collections.get(path) {
            if !docs.is_empty() {
                let initial = docs
                    .iter()
                    .map(|(key, fields)| DocumentChange::added(key.clone(), fields.clone()))
                    .collect();
                let _ = sender.send(FeedEvent::Changes(initial));
            }
        }

        self.subscribers
            .entry(path.to_string())
            .or_default()
            .push(Subscriber {
                id: id.clone(),
                sender,
            });

        tracing::info!(path = %path, subscription = %id, "feed subscription registered");
        (receiver, id)
    }

    fn unsubscribe(&self, path: &str, subscription: &SubscriptionId) {
        if let Some(mut subscribers) = self.subscribers.get_mut(path) {
            let before = subscribers.len();
            subscribers.retain(|s| &s.id != subscription);
            if subscribers.len() < before {
                tracing::info!(path = %path, subscription = %subscription, "feed subscription removed");
                return;
            }
        }
        tracing::debug!(path = %path, subscription = %subscription, "unsubscribe for unknown feed subscription");
    }

    fn insert<'a>(&'a self, path: &'a str, fields: Fields) -> BoxFuture<'a, WriteResult> {
        Box::pin(async move {
            let key = uuid::Uuid::new_v4().to_string();
            self.collections
                .entry(path.to_string())
                .or_default()
                .insert(key.clone(), fields.clone());

            self.broadcast(
                path,
                FeedEvent::Changes(vec![DocumentChange::added(key.clone(), fields)]),
            );
            Ok(DocumentRef {
                collection: path.to_string(),
                id: key,
            })
        })
    }

    fn update<'a>(
        &'a self,
        path: &'a str,
        key: &'a str,
        partial: Fields,
    ) -> BoxFuture<'a, WriteResult> {
        Box::pin(async move {
            {
                let mut docs = self
                    .collections
                    .get_mut(path)
                    .ok_or_else(|| WriteError::NotFound(key.to_string()))?;
                let stored = docs
                    .get_mut(key)
                    .ok_or_else(|| WriteError::NotFound(key.to_string()))?;
                for (name, value) in &partial {
                    stored.insert(name.clone(), value.clone());
                }
            }

            // The feed carries only the written fields, like a server-side
            // partial update; new subscribers get the merged document.
            self.broadcast(
                path,
                FeedEvent::Changes(vec![DocumentChange::modified(key.to_string(), partial)]),
            );
            Ok(DocumentRef {
                collection: path.to_string(),
                id: key.to_string(),
            })
        })
    }

    fn delete<'a>(&'a self, path: &'a str, key: &'a str) -> BoxFuture<'a, WriteResult> {
        Box::pin(async move {
            {
                let mut docs = self
                    .collections
                    .get_mut(path)
                    .ok_or_else(|| WriteError::NotFound(key.to_string()))?;
                docs.remove(key)
                    .ok_or_else(|| WriteError::NotFound(key.to_string()))?;
            }

            self.broadcast(path, FeedEvent::Changes(vec![DocumentChange::removed(key)]));
            Ok(DocumentRef {
                collection: path.to_string(),
                id: key.to_string(),
            })
        })
    }
}
