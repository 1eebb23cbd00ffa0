//! Error types for the Apteligent kit.

/// Errors that can occur when using the Apteligent kit.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid kit configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Attribute value could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
