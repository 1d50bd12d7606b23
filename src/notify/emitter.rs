//! In-process fan-out of applied configuration updates.

use crate::document::ConfigDocument;
use parking_lot::RwLock;
use std::panic::{AssertUnwindSafe, catch_unwind};
use tracing::error;

type UpdateCallback = Box<dyn Fn(&ConfigDocument) + Send + Sync>;

/// Ordered registry of configuration-update subscribers.
///
/// Subscribers register once at startup and are dispatched synchronously,
/// in registration order, each time an update commits. There is no
/// unsubscribe; the registry lives as long as the process.
///
/// Failure isolation: a subscriber that panics is caught and logged, and
/// the remaining subscribers in the same dispatch still run.
///
/// # Examples
///
/// ```rust
/// use fleet_config::notify::UpdateEmitter;
/// use fleet_config::document::ConfigDocument;
///
/// let emitter = UpdateEmitter::new();
/// emitter.subscribe(|document: &ConfigDocument| {
///     println!("now serving {}", document.transport.service_name);
/// });
/// emitter.emit(&ConfigDocument::default());
/// ```
#[derive(Default)]
pub struct UpdateEmitter {
    subscribers: RwLock<Vec<UpdateCallback>>,
}

impl UpdateEmitter {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber. Dispatch order is registration order.
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&ConfigDocument) + Send + Sync + 'static,
    {
        self.subscribers.write().push(Box::new(callback));
    }

    /// Dispatch an applied document to every subscriber.
    pub fn emit(&self, document: &ConfigDocument) {
        let subscribers = self.subscribers.read();
        for callback in subscribers.iter() {
            if catch_unwind(AssertUnwindSafe(|| callback(document))).is_err() {
                error!("configuration subscriber panicked; continuing with remaining subscribers");
            }
        }
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }
}
