//! Error types for fleet-config.

/// Result type alias for fleet-config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur when loading or applying configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to load configuration from a file or URL.
    #[error("Failed to load configuration: {0}")]
    Load(String),

    /// Configuration data could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// An update was rejected because required fields are absent.
    ///
    /// Carries the missing field names in the order the check reported them.
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// The configuration pull at service-ready time failed.
    #[error("Failed to pull configuration: {0}")]
    Pull(String),

    /// A managed resource refused a shutdown or restart request.
    #[error("Resource cycle failed: {0}")]
    Resource(String),

    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
