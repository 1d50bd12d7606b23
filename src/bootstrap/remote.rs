//! Network-based bootstrap source.

use crate::error::{ConfigError, Result};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub(super) async fn fetch(url: &str) -> Result<Value> {
    let client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|err| ConfigError::Load(format!("failed to create HTTP client: {err}")))?;

    let response = client
        .get(url)
        .header(CONTENT_TYPE, "application/json")
        .header(ACCEPT, "application/json; charset=UTF-8")
        .send()
        .await
        .map_err(|err| ConfigError::Load(format!("configuration request to {url} failed: {err}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ConfigError::Load(format!(
            "configuration request to {url} answered with status {status}"
        )));
    }

    response
        .json()
        .await
        .map_err(|err| ConfigError::Parse(format!("{url}: body is not valid JSON ({err})")))
}
