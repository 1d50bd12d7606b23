//! The configuration data model.
//!
//! A configuration document has a fixed two-section structure: a typed
//! transport section governing service identity, network address/port and
//! store connection details, and an open application-level mapping for
//! everything the hosting service defines itself. Updates replace the
//! running document wholesale; two application-level fields established at
//! service start (the version marker and the route-registration callback)
//! are copied forward across replacements.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Key of the application-level section holding [`UpdateOptions`].
pub const UPDATE_OPTIONS_FIELD: &str = "updates";

/// Callback invoked by the hosting service to re-register its routes.
///
/// Established once at service start and carried forward across
/// configuration replacements; never present on the wire.
pub type RouteRegistrar = Arc<dyn Fn() + Send + Sync>;

/// Transport-layer store connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreSettings {
    /// Connection URL of the key-value store backing the transport.
    pub url: String,
    /// Store database index.
    pub db: u16,
    /// Additional store settings the transport layer understands.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The transport (messaging-layer) section of a configuration document.
///
/// Governs service identity, the network address and port the service
/// binds, and the transport-specific store connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TransportConfig {
    /// Name under which the service registers on the bus.
    pub service_name: String,
    /// Version string of the running service instance.
    pub service_version: String,
    /// Address the network-facing worker binds.
    pub service_ip: String,
    /// Port the network-facing worker binds.
    pub service_port: u16,
    /// Store connection settings.
    pub store: StoreSettings,
    /// Additional transport fields carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The application-level section of a configuration document.
///
/// An open mapping from field name to arbitrary value, plus the two fields
/// that survive wholesale replacement because they are set only at service
/// start: the version marker and the route-registration callback.
#[derive(Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AppSection {
    /// Version marker set at service bootstrap; carried forward on update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Route-registration callback; never serialized, carried forward on update.
    #[serde(skip)]
    pub register_routes: Option<RouteRegistrar>,
    /// The open application-level field mapping.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl fmt::Debug for AppSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppSection")
            .field("version", &self.version)
            .field("register_routes", &self.register_routes.is_some())
            .field("fields", &self.fields)
            .finish()
    }
}

// Equality ignores the callback: it is an opaque handle, not data.
impl PartialEq for AppSection {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version && self.fields == other.fields
    }
}

/// A full configuration document: the live running snapshot, and also the
/// wholesale replacement body carried by update messages.
///
/// # Examples
///
/// ```rust
/// use fleet_config::document::ConfigDocument;
///
/// let document: ConfigDocument = serde_json::from_value(serde_json::json!({
///     "transport": { "serviceName": "svc", "serviceVersion": "1.0.0", "servicePort": 8080 },
///     "logLevel": "debug"
/// })).unwrap();
///
/// assert_eq!(document.transport.service_port, 8080);
/// assert_eq!(document.app_field("logLevel").and_then(|v| v.as_str()), Some("debug"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDocument {
    /// The transport (messaging-layer) section.
    #[serde(default)]
    pub transport: TransportConfig,
    /// The application-level section.
    #[serde(flatten)]
    pub application: AppSection,
}

impl ConfigDocument {
    /// Look up an application-level field by name.
    pub fn app_field(&self, name: &str) -> Option<&Value> {
        self.application.fields.get(name)
    }
}

/// Engine behavior options embedded in the application-level section under
/// the [`UPDATE_OPTIONS_FIELD`] key. An absent section means defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateOptions {
    /// Cycle the store connection when an update is applied.
    pub reconnect_store: bool,
}

impl UpdateOptions {
    /// Read the options out of a document; defaults when the section is
    /// absent or has an unexpected shape.
    pub fn from_document(document: &ConfigDocument) -> Self {
        document
            .app_field(UPDATE_OPTIONS_FIELD)
            .cloned()
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or_default()
    }
}
