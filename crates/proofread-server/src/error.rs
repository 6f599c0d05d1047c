//! Error types for the proofreading server.

use thiserror::Error;

/// Result type for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Errors that can occur while serving requests.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Issue derivation or collaborator error
    #[error(transparent)]
    Core(#[from] proofread_core::Error),

    /// Invalid or incomplete configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The content repository clone is missing or malformed
    #[error("Repository error: {0}")]
    Repository(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML metadata error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP client setup error
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ServerError {
    /// Short machine-readable name for API responses.
    pub fn kind(&self) -> &'static str {
        match self {
            ServerError::Core(e) => match e {
                proofread_core::Error::Validation(_) => "validation",
                proofread_core::Error::NotFound { .. } => "not_found",
                proofread_core::Error::UnknownKind(_) => "unknown_kind",
                proofread_core::Error::Template(_) => "template",
                proofread_core::Error::UpstreamUnavailable { .. } => "upstream_unavailable",
                proofread_core::Error::UpstreamRejected { .. } => "upstream_rejected",
            },
            ServerError::Config(_) => "config",
            ServerError::Repository(_) => "repository",
            ServerError::Io(_) => "io",
            ServerError::Yaml(_) => "yaml",
            ServerError::Serialization(_) => "serialization",
            ServerError::Http(_) => "http",
        }
    }
}
