//! Ownership scopes for subscription teardown.
//!
//! The embedding layer owns component lifecycles; this crate only needs a
//! place to register teardown work. A [`Scope`] collects teardown callbacks
//! and runs them exactly once when the owning lifecycle ends.

use crate::error::ContextError;
use std::sync::{Arc, Mutex, PoisonError};

type Callback = Box<dyn FnOnce() + Send>;

/// A disposal-capable owning scope.
///
/// Cheap to clone; all clones share the same disposal state.
#[derive(Clone, Default)]
pub struct Scope {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    callbacks: Vec<Callback>,
    disposed: bool,
}

impl Scope {
    /// Create a live scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a teardown callback, run once when the scope is disposed.
    ///
    /// Fails with [`ContextError`] if the scope has already been disposed;
    /// the callback is dropped without running.
    pub fn on_dispose(
        &self,
        callback: impl FnOnce() + Send + 'static,
    ) -> Result<(), ContextError> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.disposed {
            return Err(ContextError("scope already disposed".to_string()));
        }
        inner.callbacks.push(Box::new(callback));
        Ok(())
    }

    /// Dispose the scope, running registered callbacks in registration
    /// order. Further calls are no-ops.
    pub fn dispose(&self) {
        let callbacks = {
            let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            if inner.disposed {
                return;
            }
            inner.disposed = true;
            std::mem::take(&mut inner.callbacks)
        };
        // Run outside the lock so callbacks may inspect the scope.
        for callback in callbacks {
            callback();
        }
    }

    /// Whether this scope has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .disposed
    }
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
