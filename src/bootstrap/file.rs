//! File-based bootstrap source.

use crate::error::{ConfigError, Result};
use serde_json::Value;

pub(super) fn read(path: &str) -> Result<Value> {
    let raw = std::fs::read_to_string(path)
        .map_err(|err| ConfigError::Load(format!("cannot read configuration file {path}: {err}")))?;
    serde_json::from_str(&raw)
        .map_err(|err| ConfigError::Parse(format!("{path}: contents are not valid JSON ({err})")))
}
