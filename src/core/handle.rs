//! The process-wide configuration snapshot accessor.

use crate::document::ConfigDocument;
use arc_swap::ArcSwap;
use std::sync::Arc;

/// Handle to the running configuration, providing lock-free reads and
/// atomic wholesale replacement.
///
/// Clones share the same underlying cell, so a handle can be passed freely
/// to every part of the process that needs read access. Replacement is
/// reserved for the reconciliation engine; everything else sees snapshots.
///
/// # Examples
///
/// ```rust
/// use fleet_config::core::ConfigHandle;
/// use fleet_config::document::ConfigDocument;
///
/// let handle = ConfigHandle::new(ConfigDocument::default());
/// let snapshot = handle.snapshot();
/// assert!(snapshot.transport.service_name.is_empty());
/// ```
pub struct ConfigHandle {
    current: Arc<ArcSwap<ConfigDocument>>,
}

impl ConfigHandle {
    /// Create a handle seeded with the bootstrap document.
    pub fn new(initial: ConfigDocument) -> Self {
        Self {
            current: Arc::new(ArcSwap::new(Arc::new(initial))),
        }
    }

    /// Get a reference-counted snapshot of the current configuration.
    ///
    /// Lock-free; readers never block the engine or each other.
    pub fn snapshot(&self) -> Arc<ConfigDocument> {
        self.current.load_full()
    }

    /// Atomically replace the running configuration.
    pub(crate) fn replace(&self, next: ConfigDocument) {
        self.current.store(Arc::new(next));
    }
}

impl Clone for ConfigHandle {
    fn clone(&self) -> Self {
        Self {
            current: Arc::clone(&self.current),
        }
    }
}
