//! The two service-side integrations composed from the core engine.
//!
//! Both adapters delegate everything to one [`UpdateEngine`]; they differ
//! only in which dependent resource they additionally cycle and which
//! validation hook they install. A service embedding only the messaging
//! layer uses [`MessagingAdapter`]; a service that also fronts an HTTP
//! server uses [`HttpServerAdapter`], which restarts the listener when an
//! update moves the bind address and guards the application section with a
//! required-field check.

use crate::core::{ConfigHandle, RequiredFieldCheck, UpdateEngine, UpdateOutcome};
use crate::document::ConfigDocument;
use crate::error::Result;
use crate::message::{ControlChannel, Envelope};
use crate::reconcile::{ListenerControl, StoreConnection};
use std::sync::Arc;

/// Plain messaging-layer integration.
///
/// # Examples
///
/// ```rust
/// use fleet_config::adapters::MessagingAdapter;
/// use fleet_config::core::ConfigHandle;
///
/// let handle = ConfigHandle::new(Default::default());
/// let adapter = MessagingAdapter::new(handle.clone());
/// adapter.subscribe(|document| {
///     println!("log level is now {:?}", document.app_field("logLevel"));
/// });
/// ```
pub struct MessagingAdapter {
    engine: UpdateEngine,
}

impl MessagingAdapter {
    /// Create an adapter with no managed store connection.
    pub fn new(handle: ConfigHandle) -> Self {
        Self {
            engine: UpdateEngine::builder(handle).build(),
        }
    }

    /// Create an adapter whose store connection is cycled when the
    /// running document opts in via `updates.reconnectStore`.
    pub fn with_store(handle: ConfigHandle, store: Arc<dyn StoreConnection>) -> Self {
        Self {
            engine: UpdateEngine::builder(handle).with_store(store).build(),
        }
    }

    /// Wrap an engine that was composed by hand.
    pub fn from_engine(engine: UpdateEngine) -> Self {
        Self { engine }
    }

    /// Feed one inbound bus envelope through the update pipeline.
    pub fn handle_message(&self, envelope: &Envelope) -> Result<UpdateOutcome> {
        self.engine.handle_message(envelope)
    }

    /// Pull a configuration override once the service is ready.
    pub async fn service_ready(&self, channel: &dyn ControlChannel) -> Result<()> {
        self.engine.service_ready(channel).await
    }

    /// Register an in-process subscriber for applied updates.
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&ConfigDocument) + Send + Sync + 'static,
    {
        self.engine.subscribe(callback);
    }

    /// The handle to the running configuration.
    pub fn config(&self) -> &ConfigHandle {
        self.engine.config()
    }
}

/// HTTP-server-aware integration: additionally cycles the network listener
/// and validates required application fields before committing an update.
pub struct HttpServerAdapter {
    engine: UpdateEngine,
}

impl HttpServerAdapter {
    /// Create an adapter around the server's listener control and the
    /// service's required-field check.
    pub fn new(
        handle: ConfigHandle,
        listener: Arc<dyn ListenerControl>,
        required: RequiredFieldCheck,
    ) -> Self {
        Self {
            engine: UpdateEngine::builder(handle)
                .with_listener(listener)
                .with_required_fields(required)
                .build(),
        }
    }

    /// Wrap an engine that was composed by hand, e.g. to add a store
    /// connection or a custom drain window.
    pub fn from_engine(engine: UpdateEngine) -> Self {
        Self { engine }
    }

    /// Feed one inbound bus envelope through the update pipeline.
    pub fn handle_message(&self, envelope: &Envelope) -> Result<UpdateOutcome> {
        self.engine.handle_message(envelope)
    }

    /// Pull a configuration override once the service is ready.
    pub async fn service_ready(&self, channel: &dyn ControlChannel) -> Result<()> {
        self.engine.service_ready(channel).await
    }

    /// Register an in-process subscriber for applied updates.
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&ConfigDocument) + Send + Sync + 'static,
    {
        self.engine.subscribe(callback);
    }

    /// The handle to the running configuration.
    pub fn config(&self) -> &ConfigHandle {
        self.engine.config()
    }
}
