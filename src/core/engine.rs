//! The update pipeline: receive, gate, merge, reconcile, emit.

use crate::core::gate::{self, VersionDecision};
use crate::core::handle::ConfigHandle;
use crate::core::merger::{self, RequiredFieldCheck};
use crate::document::{ConfigDocument, UpdateOptions};
use crate::error::{ConfigError, Result};
use crate::message::{
    ApiRequest, CONFIG_SERVICE, CONFIG_SERVICE_ORIGIN, ControlChannel, Envelope, HTTP_OK,
    UPDATE_MESSAGE_TYPE, UpdatePayload,
};
use crate::notify::UpdateEmitter;
use crate::reconcile::{ListenerControl, ListenerCycler, StoreConnection, cycle_store};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

/// What the pipeline did with an inbound envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The update passed every stage and the configuration was replaced.
    Applied,
    /// The envelope was discarded without touching the configuration.
    Ignored(IgnoreReason),
}

/// Why an envelope was discarded. Distinctions matter for diagnostics
/// only; none of them raise an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The envelope did not come from the config service.
    ForeignOrigin,
    /// The envelope is not a configuration-refresh instruction.
    UnknownType,
    /// The body does not parse as an update payload.
    MalformedBody,
    /// The update targets a different service version.
    VersionMismatch,
}

/// The live configuration-update engine.
///
/// One engine owns the running configuration of a service process. Inbound
/// bus traffic is fed to [`handle_message`](UpdateEngine::handle_message);
/// everything that survives the origin, type and version gates is merged
/// into the running snapshot, dependent resources are cycled, and the
/// merged document is fanned out to in-process subscribers.
///
/// # Examples
///
/// ```rust
/// use fleet_config::core::{ConfigHandle, UpdateEngine, UpdateOutcome};
/// use fleet_config::message::Envelope;
///
/// let handle = ConfigHandle::new(Default::default());
/// let engine = UpdateEngine::builder(handle.clone()).build();
///
/// let envelope: Envelope = serde_json::from_value(serde_json::json!({
///     "from": "config-service:/",
///     "to": "svc:/",
///     "type": "configRefresh",
///     "body": {
///         "targetVersion": "*",
///         "config": {
///             "transport": { "serviceName": "svc", "serviceVersion": "1.0.0" },
///             "logLevel": "debug"
///         }
///     }
/// })).unwrap();
///
/// assert_eq!(engine.handle_message(&envelope).unwrap(), UpdateOutcome::Applied);
/// assert_eq!(
///     handle.snapshot().app_field("logLevel").and_then(|v| v.as_str()),
///     Some("debug")
/// );
/// ```
pub struct UpdateEngine {
    handle: ConfigHandle,
    store: Option<Arc<dyn StoreConnection>>,
    listener: Option<ListenerCycler>,
    required: Option<RequiredFieldCheck>,
    reconnect_store: AtomicBool,
    emitter: UpdateEmitter,
}

impl UpdateEngine {
    /// Start building an engine around a configuration handle.
    pub fn builder(handle: ConfigHandle) -> UpdateEngineBuilder {
        UpdateEngineBuilder {
            handle,
            store: None,
            listener: None,
            drain_window: None,
            required: None,
            reconnect_store: None,
        }
    }

    /// The handle to the running configuration.
    pub fn config(&self) -> &ConfigHandle {
        &self.handle
    }

    /// Register an in-process subscriber for applied updates.
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&ConfigDocument) + Send + Sync + 'static,
    {
        self.emitter.subscribe(callback);
    }

    /// Whether the next applied update will cycle the store connection.
    pub fn reconnect_store_enabled(&self) -> bool {
        self.reconnect_store.load(Ordering::SeqCst)
    }

    /// Feed one inbound bus envelope through the pipeline.
    ///
    /// Traffic that is not an applicable configuration update is discarded
    /// with a log line and an [`UpdateOutcome::Ignored`]; a shared bus
    /// carries plenty of unrelated messages and none of them are errors.
    /// The only error is a rejected merge: missing required fields.
    pub fn handle_message(&self, envelope: &Envelope) -> Result<UpdateOutcome> {
        if envelope.from != CONFIG_SERVICE_ORIGIN {
            debug!(from = %envelope.from, "ignoring message from foreign origin");
            return Ok(UpdateOutcome::Ignored(IgnoreReason::ForeignOrigin));
        }
        if envelope.kind != UPDATE_MESSAGE_TYPE {
            debug!(kind = %envelope.kind, "unrecognized message type");
            return Ok(UpdateOutcome::Ignored(IgnoreReason::UnknownType));
        }

        let payload: UpdatePayload = match serde_json::from_value(envelope.body.clone()) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, "discarding configuration update with malformed body");
                return Ok(UpdateOutcome::Ignored(IgnoreReason::MalformedBody));
            }
        };

        let running = self.handle.snapshot().transport.service_version.clone();
        let decision = gate::evaluate(payload.target_version.as_deref(), &running);
        match decision {
            VersionDecision::Exact => debug!(version = %running, "update targets this version"),
            VersionDecision::AllVersions => debug!("update targets all versions"),
            VersionDecision::Unspecified => {
                warn!("update did not target a version or wildcard; applying anyway");
            }
            VersionDecision::Mismatch => {
                debug!(
                    target = payload.target_version.as_deref().unwrap_or_default(),
                    running = %running,
                    "update targets another version"
                );
                return Ok(UpdateOutcome::Ignored(IgnoreReason::VersionMismatch));
            }
        }

        self.apply(payload.config)?;
        Ok(UpdateOutcome::Applied)
    }

    /// Apply a replacement document that already passed (or does not need)
    /// the envelope gates: merge, reconcile dependent resources, emit.
    pub fn apply(&self, incoming: ConfigDocument) -> Result<()> {
        let (previous, merged) =
            merger::merge_into(&self.handle, incoming, self.required.as_ref())?;

        // an applied document can flip its own engine options, including
        // for the cycles triggered right below
        let options = UpdateOptions::from_document(&merged);
        self.reconnect_store.store(options.reconnect_store, Ordering::SeqCst);

        if options.reconnect_store {
            if let Some(store) = &self.store {
                cycle_store(Arc::clone(store), self.handle.clone());
            }
        }
        if let Some(listener) = &self.listener {
            listener.maybe_cycle(&previous.transport, &merged.transport, &self.handle);
        }

        self.emitter.emit(&merged);
        info!(service = %merged.transport.service_name, "configuration update applied");
        Ok(())
    }

    /// Ask the config service for an override at service-ready time.
    ///
    /// Issues `config-service:[GET]/v1/config/{name}/{version}` through the
    /// control channel. A 200 response with a non-empty result is applied
    /// exactly like a pushed update, minus the envelope gates: the response
    /// was addressed to this instance. An empty result means no override.
    pub async fn service_ready(&self, channel: &dyn ControlChannel) -> Result<()> {
        let transport = self.handle.snapshot().transport.clone();
        info!(
            service = %transport.service_name,
            version = %transport.service_version,
            "requesting configuration override"
        );

        let request = ApiRequest {
            to: format!(
                "{CONFIG_SERVICE}:[GET]/v1/config/{}/{}",
                transport.service_name, transport.service_version
            ),
            from: format!("{}:/", transport.service_name),
            body: Value::Object(Default::default()),
        };

        let response = channel.request(request).await?;
        if response.status != HTTP_OK {
            return Err(ConfigError::Pull(format!(
                "config service answered with status {}",
                response.status
            )));
        }

        match &response.result {
            Value::Object(map) if !map.is_empty() => {
                let document: ConfigDocument = serde_json::from_value(response.result.clone())?;
                self.apply(document)
            }
            _ => {
                info!("no config override available");
                Ok(())
            }
        }
    }
}

/// Builder for [`UpdateEngine`].
///
/// The plain messaging integration needs nothing beyond the handle; the
/// HTTP-server-aware integration adds a listener control and a
/// required-field check. Store cycling is opt-in through the
/// `reconnectStore` option of the running document, seeded here.
pub struct UpdateEngineBuilder {
    handle: ConfigHandle,
    store: Option<Arc<dyn StoreConnection>>,
    listener: Option<Arc<dyn ListenerControl>>,
    drain_window: Option<Duration>,
    required: Option<RequiredFieldCheck>,
    reconnect_store: Option<bool>,
}

impl UpdateEngineBuilder {
    /// Attach the store connection the reconciler may cycle.
    pub fn with_store(mut self, store: Arc<dyn StoreConnection>) -> Self {
        self.store = Some(store);
        self
    }

    /// Attach the listener control the reconciler cycles on address changes.
    pub fn with_listener(mut self, control: Arc<dyn ListenerControl>) -> Self {
        self.listener = Some(control);
        self
    }

    /// Override the drain window used before listener restarts.
    pub fn with_drain_window(mut self, window: Duration) -> Self {
        self.drain_window = Some(window);
        self
    }

    /// Install the required-field check consulted before committing the
    /// application section.
    pub fn with_required_fields(mut self, check: RequiredFieldCheck) -> Self {
        self.required = Some(check);
        self
    }

    /// Force the initial store-reconnect flag instead of reading it from
    /// the bootstrap document.
    pub fn reconnect_store(mut self, enabled: bool) -> Self {
        self.reconnect_store = Some(enabled);
        self
    }

    /// Build the engine.
    pub fn build(self) -> UpdateEngine {
        let seeded = self.reconnect_store.unwrap_or_else(|| {
            UpdateOptions::from_document(&self.handle.snapshot()).reconnect_store
        });

        let listener = self.listener.map(|control| match self.drain_window {
            Some(window) => ListenerCycler::with_drain_window(control, window),
            None => ListenerCycler::new(control),
        });

        UpdateEngine {
            handle: self.handle,
            store: self.store,
            listener,
            required: self.required,
            reconnect_store: AtomicBool::new(seeded),
            emitter: UpdateEmitter::new(),
        }
    }
}
