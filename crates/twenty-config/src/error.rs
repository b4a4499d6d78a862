//! Configuration error types.

/// Result type alias for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while building or querying the workspace registry.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Neither configuration shape was supplied.
    #[error(
        "no workspace configured: provide a workspaces declaration or both a base URL and an API key"
    )]
    MissingConfiguration,

    /// The registry holds no workspaces.
    #[error("no workspaces are configured")]
    NoWorkspaces,

    /// A multi-workspace declaration listed no entries.
    #[error("workspaces declaration is empty")]
    EmptyWorkspaceList,

    /// Two declaration entries share a name.
    #[error("workspace '{0}' is declared more than once")]
    DuplicateWorkspace(String),

    /// A declaration entry is missing its name, base URL or API key.
    #[error("workspace '{name}' is invalid: {reason}")]
    InvalidWorkspace { name: String, reason: String },

    /// Requested workspace is not configured.
    #[error("Workspace '{name}' not found. Available: {available}")]
    WorkspaceNotFound { name: String, available: String },

    /// Failed to read a declaration file.
    #[error("failed to read config file '{path}': {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },

    /// Failed to parse a workspaces declaration.
    #[error("failed to parse workspaces declaration: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
