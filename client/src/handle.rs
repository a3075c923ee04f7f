//! Store connector - one shared handle per backend identity.

use crate::backend::StoreBackend;
use crate::config::{ConfigError, StoreConfig};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::{Arc, OnceLock};

// Process-wide handle registry, keyed by project id. Re-connecting with the
// same identity returns the registered handle instead of double-registering.
static HANDLES: OnceLock<DashMap<String, StoreHandle>> = OnceLock::new();

fn registry() -> &'static DashMap<String, StoreHandle> {
    HANDLES.get_or_init(DashMap::new)
}

/// Shared handle to a connected document store.
///
/// Cheap to clone; all clones refer to the same backend.
#[derive(Clone)]
pub struct StoreHandle {
    project_id: String,
    backend: Arc<dyn StoreBackend>,
}

impl StoreHandle {
    /// The project identity this handle was registered under.
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub(crate) fn backend(&self) -> &Arc<dyn StoreBackend> {
        &self.backend
    }
}

impl std::fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreHandle")
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}

/// Connect to the backing store, once per credentials identity.
///
/// The first call for a project id validates the config, applies the
/// emulator redirect if configured, and registers the handle process-wide.
/// Later calls with the same project id return the registered handle
/// unchanged (their `backend` argument is ignored).
///
/// A failed emulator redirect - including "already redirected" - does not
/// fail the connect; it is logged as a warning so misconfigurations stay
/// visible.
pub fn connect(
    config: StoreConfig,
    backend: Arc<dyn StoreBackend>,
) -> Result<StoreHandle, ConfigError> {
    config.validate()?;
    let project_id = config.credentials.project_id.clone();

    match registry().entry(project_id.clone()) {
        Entry::Occupied(entry) => {
            tracing::debug!(project_id = %project_id, "store already connected, reusing handle");
            Ok(entry.get().clone())
        }
        Entry::Vacant(entry) => {
            if let Some(emulator) = &config.emulator {
                if let Err(reason) = backend.use_emulator(&emulator.host, emulator.port) {
                    tracing::warn!(
                        host = %emulator.host,
                        port = emulator.port,
                        %reason,
                        "emulator redirect failed; continuing with current backend configuration"
                    );
                }
            }

            let handle = StoreHandle {
                project_id: project_id.clone(),
                backend,
            };
            entry.insert(handle.clone());
            tracing::info!(project_id = %project_id, "store connected");
            Ok(handle)
        }
    }
}
