//! Control-traffic message shapes and the bus request seam.
//!
//! All control traffic rides a shared bus as addressed envelopes; only a
//! small slice of it is configuration traffic. The constants here identify
//! that slice: the well-known config-service origin and the update type tag.

use crate::document::ConfigDocument;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name of the config service on the bus.
pub const CONFIG_SERVICE: &str = "config-service";

/// Origin identity configuration updates must carry to be honored.
pub const CONFIG_SERVICE_ORIGIN: &str = "config-service:/";

/// Type tag marking an envelope as a configuration-refresh instruction.
pub const UPDATE_MESSAGE_TYPE: &str = "configRefresh";

/// Status code of a successful configuration pull.
pub const HTTP_OK: u16 = 200;

/// An addressed control message as delivered by the bus.
///
/// The body stays raw JSON until the receiver has established that the
/// envelope is configuration traffic at all.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Envelope {
    /// Origin identity.
    pub from: String,
    /// Destination identity.
    pub to: String,
    /// Message type tag.
    #[serde(rename = "type")]
    pub kind: String,
    /// Raw message body.
    pub body: Value,
}

/// Parsed body of a configuration-update envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePayload {
    /// Version the update targets: a literal version, a wildcard token,
    /// or absent.
    #[serde(default)]
    pub target_version: Option<String>,
    /// The full replacement configuration document.
    pub config: ConfigDocument,
}

/// An addressed request sent through the bus request/response channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequest {
    /// Destination route, e.g. `config-service:[GET]/v1/config/svc/1.0.0`.
    pub to: String,
    /// Origin identity of the requesting service.
    pub from: String,
    /// Request body.
    #[serde(default)]
    pub body: Value,
}

/// Response to an [`ApiRequest`].
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiResponse {
    /// HTTP-style status code.
    pub status: u16,
    /// Result payload; an empty object means nothing to report.
    pub result: Value,
}

/// Request/response seam to the messaging substrate.
///
/// The bus itself (delivery, discovery, RPC routing) lives outside this
/// crate; implement this trait on whatever client talks to it.
#[async_trait]
pub trait ControlChannel: Send + Sync {
    /// Send an addressed request and await its response.
    async fn request(&self, request: ApiRequest) -> Result<ApiResponse>;
}
