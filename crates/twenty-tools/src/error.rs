//! Error types for tool handlers.

use thiserror::Error;

/// Result type for tool handlers.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type for tool handlers.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Client or workspace failure.
    #[error(transparent)]
    Client(#[from] twenty_client::Error),

    /// Operation not offered for this entity.
    #[error("{entity} do not support {operation}")]
    Unsupported {
        entity: &'static str,
        operation: &'static str,
    },

    /// Resource URI not recognised.
    #[error("unknown resource: {0}")]
    UnknownResource(String),

    /// Arguments could not be interpreted.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
}

impl ToolError {
    /// True for failures that never reached the backend because the
    /// workspace or client could not be resolved.
    pub fn is_config_error(&self) -> bool {
        matches!(self, ToolError::Client(e) if e.is_config_error())
    }
}

impl From<twenty_config::ConfigError> for ToolError {
    fn from(err: twenty_config::ConfigError) -> Self {
        ToolError::Client(err.into())
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        ToolError::InvalidArguments(err.to_string())
    }
}
