//! Initial configuration loading.
//!
//! A service resolves its bootstrap configuration from a local file path or
//! an `http`-prefixed URL. Either kind of source may answer with a pointer
//! instead of a document: a top-level string `location` field redirects to
//! another file or URL, and redirects may chain across source kinds. This
//! is a one-shot, best-effort retrieval at startup; failures surface to the
//! caller and are expected to halt the service.

mod file;
mod remote;

use crate::document::ConfigDocument;
use crate::error::{ConfigError, Result};
use serde_json::Value;
use tracing::debug;

/// Field redirecting to another configuration source.
pub const LOCATION_FIELD: &str = "location";

// redirects chain, so a cycle between two sources must bottom out
const MAX_REDIRECT_HOPS: usize = 8;

/// Load and parse the bootstrap configuration document.
///
/// # Examples
///
/// ```rust,no_run
/// # async fn example() -> fleet_config::error::Result<()> {
/// let document = fleet_config::bootstrap::load("config/service.json").await?;
/// println!("starting as {}", document.transport.service_name);
/// # Ok(())
/// # }
/// ```
pub async fn load(source: &str) -> Result<ConfigDocument> {
    let value = load_value(source).await?;
    serde_json::from_value(value)
        .map_err(|err| ConfigError::Parse(format!("{source}: {err}")))
}

/// Load the bootstrap configuration as raw JSON, following redirects.
pub async fn load_value(source: &str) -> Result<Value> {
    resolve(source, 0).await
}

async fn resolve(source: &str, hops: usize) -> Result<Value> {
    if hops > MAX_REDIRECT_HOPS {
        return Err(ConfigError::Load(format!(
            "too many location redirects (limit {MAX_REDIRECT_HOPS})"
        )));
    }

    let value = if source.starts_with("http") {
        remote::fetch(source).await?
    } else {
        file::read(source)?
    };

    match value.get(LOCATION_FIELD).and_then(Value::as_str) {
        Some(next) => {
            debug!(from = %source, to = %next, "following configuration redirect");
            let next = next.to_string();
            Box::pin(resolve(&next, hops + 1)).await
        }
        None => Ok(value),
    }
}
