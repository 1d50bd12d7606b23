//! Merging an accepted update into the running configuration.

use crate::core::handle::ConfigHandle;
use crate::document::ConfigDocument;
use crate::error::{ConfigError, Result};
use std::sync::Arc;

/// The required-field validation contract.
///
/// Supplied by the hosting service: takes a candidate document and returns
/// the ordered list of missing required field names. An empty list means
/// the candidate is valid. The check must be pure; it is consulted before
/// the application section is replaced.
pub type RequiredFieldCheck = Arc<dyn Fn(&ConfigDocument) -> Vec<String> + Send + Sync>;

/// Build a [`RequiredFieldCheck`] over names in the application-level
/// field mapping.
///
/// # Examples
///
/// ```rust
/// use fleet_config::core::require_app_fields;
/// use fleet_config::document::ConfigDocument;
///
/// let check = require_app_fields(&["logLevel"]);
/// assert_eq!(check(&ConfigDocument::default()), vec!["logLevel".to_string()]);
/// ```
pub fn require_app_fields(names: &[&str]) -> RequiredFieldCheck {
    let names: Vec<String> = names.iter().map(|name| name.to_string()).collect();
    Arc::new(move |document: &ConfigDocument| {
        names
            .iter()
            .filter(|name| !document.application.fields.contains_key(name.as_str()))
            .cloned()
            .collect()
    })
}

/// Merge an incoming replacement document into the running configuration.
///
/// The transport section is committed first as its own atomic replacement.
/// The carried-forward application fields (version marker, route callback)
/// are then copied from the previous snapshot into the incoming section,
/// the required-field check runs against the merged candidate, and only a
/// clean result commits the application section. A failed check returns
/// [`ConfigError::MissingFields`] with the application section untouched;
/// the transport section stays replaced.
///
/// Returns the pre-update snapshot and the merged document.
pub(crate) fn merge_into(
    handle: &ConfigHandle,
    incoming: ConfigDocument,
    check: Option<&RequiredFieldCheck>,
) -> Result<(Arc<ConfigDocument>, ConfigDocument)> {
    let previous = handle.snapshot();

    // transport commit always precedes the application replacement
    handle.replace(ConfigDocument {
        transport: incoming.transport.clone(),
        application: previous.application.clone(),
    });

    let mut merged = incoming;
    merged.application.version = previous.application.version.clone();
    merged.application.register_routes = previous.application.register_routes.clone();

    if let Some(check) = check {
        let missing = check(&merged);
        if !missing.is_empty() {
            return Err(ConfigError::MissingFields(missing));
        }
    }

    handle.replace(merged.clone());
    Ok((previous, merged))
}
