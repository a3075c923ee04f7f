//! Collection synchronizer - the reactive bridge between one remote
//! collection and local observers.
//!
//! [`open_collection`] opens exactly one change feed and spawns one task
//! that owns the local [`Mirror`]. The task is the mirror's only writer;
//! observers read materialized snapshots through `watch` cells. Mutation
//! calls write through to the backend and never touch the mirror - their
//! effects come back through the feed.

use crate::backend::{FeedEvent, StoreBackend, SubscriptionId, WriteResult};
use crate::error::{ContextError, Error, FeedError};
use crate::handle::StoreHandle;
use crate::scope::Scope;
use ripple_engine::{CollectionPath, Document, Fields, Mirror};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{mpsc, watch};

/// Live view of one remote collection.
///
/// Obtained from [`open_collection`]. Cheap to clone; all clones observe the
/// same subscription.
#[derive(Clone)]
pub struct CollectionView {
    path: CollectionPath,
    backend: Arc<dyn StoreBackend>,
    snapshot: watch::Receiver<Vec<Document>>,
    error: watch::Receiver<Option<FeedError>>,
}

/// Open a live view of the collection at `path`.
///
/// The subscription lives until `scope` is disposed; opening against an
/// already-disposed scope, or outside a tokio runtime, fails with
/// [`ContextError`]. Callers must not use the returned view after disposal.
pub fn open_collection(
    handle: &StoreHandle,
    path: impl Into<CollectionPath>,
    scope: &Scope,
) -> Result<CollectionView, Error> {
    let path = path.into();
    if scope.is_disposed() {
        return Err(ContextError(format!("cannot open collection '{path}'")).into());
    }
    let runtime = tokio::runtime::Handle::try_current().map_err(|_| {
        ContextError(format!(
            "cannot open collection '{path}' outside a tokio runtime"
        ))
    })?;

    let backend = Arc::clone(handle.backend());
    let (events, subscription) = backend.subscribe(&path);

    let (snapshot_tx, snapshot_rx) = watch::channel(Vec::new());
    let (error_tx, error_rx) = watch::channel(None);
    let (cancel_tx, cancel_rx) = watch::channel(false);

    runtime.spawn(sync_loop(
        path.clone(),
        events,
        snapshot_tx,
        error_tx,
        cancel_rx,
    ));

    let teardown = Arc::new(Mutex::new(Some(Teardown {
        cancel: cancel_tx,
        backend: Arc::clone(&backend),
        path: path.clone(),
        subscription,
    })));

    let registered = scope.on_dispose({
        let teardown = Arc::clone(&teardown);
        move || run_teardown(&teardown)
    });
    if registered.is_err() {
        // The scope was disposed between the liveness check and
        // registration; close the feed we just opened.
        run_teardown(&teardown);
        return Err(ContextError(format!("cannot open collection '{path}'")).into());
    }

    Ok(CollectionView {
        path,
        backend,
        snapshot: snapshot_rx,
        error: error_rx,
    })
}

struct Teardown {
    cancel: watch::Sender<bool>,
    backend: Arc<dyn StoreBackend>,
    path: CollectionPath,
    subscription: SubscriptionId,
}

fn run_teardown(slot: &Mutex<Option<Teardown>>) {
    // Taking from the slot makes teardown single-shot even if disposal
    // fires more than once.
    let Some(teardown) = slot.lock().unwrap_or_else(PoisonError::into_inner).take() else {
        return;
    };
    let _ = teardown.cancel.send(true);
    teardown
        .backend
        .unsubscribe(&teardown.path, &teardown.subscription);
    tracing::debug!(path = %teardown.path, "collection subscription closed");
}

/// One loop per subscription; sole writer of its mirror.
async fn sync_loop(
    path: CollectionPath,
    mut events: mpsc::UnboundedReceiver<FeedEvent>,
    snapshot: watch::Sender<Vec<Document>>,
    error: watch::Sender<Option<FeedError>>,
    mut cancel: watch::Receiver<bool>,
) {
    let mut mirror = Mirror::new();

    loop {
        let event = tokio::select! {
            // Also ends the loop when the teardown slot is dropped
            // without running (sender closed).
            _ = cancel.changed() => break,
            event = events.recv() => match event {
                Some(event) => event,
                None => break,
            },
        };
        // A delivery racing the cancel flag must not be applied.
        if *cancel.borrow() {
            break;
        }

        match event {
            FeedEvent::Changes(batch) => {
                mirror.apply_batch(&batch);
                snapshot.send_replace(mirror.snapshot());
                // A successful delivery always clears a prior error.
                error.send_replace(None);
                tracing::trace!(
                    path = %path,
                    changes = batch.len(),
                    documents = mirror.len(),
                    "applied change batch"
                );
            }
            FeedEvent::Error(err) => {
                // Mirror and snapshot stay untouched; the last-good
                // snapshot remains observable alongside the error.
                tracing::warn!(path = %path, error = %err, "feed reported an error");
                error.send_replace(Some(err));
            }
        }
    }

    tracing::debug!(path = %path, "sync loop stopped");
}

impl CollectionView {
    /// The collection path this view mirrors.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Current snapshot: the mirror's values as of the last applied batch,
    /// ordered by document key.
    pub fn snapshot(&self) -> Vec<Document> {
        self.snapshot.borrow().clone()
    }

    /// Observable snapshot cell, for awaiting republications.
    pub fn watch_snapshot(&self) -> watch::Receiver<Vec<Document>> {
        self.snapshot.clone()
    }

    /// The most recent feed failure, if the latest delivery was one.
    pub fn error(&self) -> Option<FeedError> {
        self.error.borrow().clone()
    }

    /// Observable error cell.
    pub fn watch_error(&self) -> watch::Receiver<Option<FeedError>> {
        self.error.clone()
    }

    /// Derived from [`error`](CollectionView::error): whether the view is
    /// currently in a degraded state.
    pub fn has_error(&self) -> bool {
        self.error.borrow().is_some()
    }

    /// Write a new document; the store assigns its key.
    ///
    /// Resolves after remote acknowledgment. Never touches the local
    /// mirror: the insert becomes visible when its change record arrives
    /// back through the feed.
    pub async fn insert(&self, fields: Fields) -> WriteResult {
        self.backend.insert(&self.path, fields).await
    }

    /// Partially update the document at `key`. Fields absent from `partial`
    /// are left untouched.
    pub async fn update(&self, key: &str, partial: Fields) -> WriteResult {
        self.backend.update(&self.path, key, partial).await
    }

    /// Delete the document at `key`.
    pub async fn remove(&self, key: &str) -> WriteResult {
        self.backend.delete(&self.path, key).await
    }
}

impl std::fmt::Debug for CollectionView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionView")
            .field("path", &self.path)
            .field("documents", &self.snapshot.borrow().len())
            .field("has_error", &self.has_error())
            .finish_non_exhaustive()
    }
}
