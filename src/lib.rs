//! # fleet-config
//!
//! Live configuration distribution for a fleet of networked services.
//!
//! ## Overview
//!
//! A service loads its bootstrap configuration from a file or URL, then
//! keeps it current by listening for configuration-refresh messages pushed
//! over the shared service bus. Each accepted update atomically replaces
//! the running snapshot, cycles the dependent subsystems whose inputs
//! changed (the transport's store connection, the network listener), and
//! fans the applied document out to in-process subscribers.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fleet_config::adapters::MessagingAdapter;
//! use fleet_config::core::ConfigHandle;
//! use fleet_config::message::Envelope;
//!
//! # async fn example() -> fleet_config::error::Result<()> {
//! // Resolve the bootstrap document (file path or http URL, `location`
//! // redirects followed automatically).
//! let document = fleet_config::bootstrap::load("config/service.json").await?;
//! let handle = ConfigHandle::new(document);
//!
//! let adapter = MessagingAdapter::new(handle.clone());
//! adapter.subscribe(|applied| {
//!     println!("configuration updated for {}", applied.transport.service_name);
//! });
//!
//! // Feed every envelope the bus delivers; unrelated traffic is ignored.
//! # let raw = serde_json::json!({});
//! let envelope: Envelope = serde_json::from_value(raw)?;
//! adapter.handle_message(&envelope)?;
//!
//! // Lock-free reads anywhere in the process.
//! println!("bound to port {}", handle.snapshot().transport.service_port);
//! # Ok(())
//! # }
//! ```
//!
//! ## Update pipeline
//!
//! Inbound envelopes pass through fixed stages, any of which may discard
//! the message without touching the running configuration:
//!
//! 1. **Receive**: only envelopes from the config service carrying the
//!    refresh type tag go further.
//! 2. **Gate**: the update must target this instance's version, a
//!    wildcard (`*` or `all`), or nothing at all (applied with a warning).
//! 3. **Merge**: the transport section commits first; bootstrap-only
//!    fields are carried forward; a required-field check guards the
//!    application section.
//! 4. **Reconcile**: the store connection and the network listener are
//!    cycled when their inputs changed, off the hot path.
//! 5. **Emit**: the merged document is dispatched to subscribers in
//!    registration order.

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod bootstrap;
pub mod core;
pub mod document;
pub mod error;
pub mod message;
pub mod notify;
pub mod reconcile;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::adapters::{HttpServerAdapter, MessagingAdapter};
    pub use crate::core::{
        ConfigHandle, IgnoreReason, RequiredFieldCheck, UpdateEngine, UpdateOutcome,
        require_app_fields,
    };
    pub use crate::document::{
        AppSection, ConfigDocument, StoreSettings, TransportConfig, UpdateOptions,
    };
    pub use crate::error::{ConfigError, Result};
    pub use crate::message::{ApiRequest, ApiResponse, ControlChannel, Envelope};
    pub use crate::notify::UpdateEmitter;
    pub use crate::reconcile::{ListenerControl, StoreConnection};
}
