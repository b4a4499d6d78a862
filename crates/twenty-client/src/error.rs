//! Client error types.

use thiserror::Error;

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Backend answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The request did not complete within the client timeout.
    #[error("Request timeout - API took too long to respond")]
    Timeout,

    /// Transport failure (DNS, connection refused, TLS, ...).
    #[error("Request failed: {0}")]
    Request(String),

    /// A 2xx response carried a body that is not JSON.
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// HTTP verb outside the supported set.
    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// Caller-supplied argument could not be interpreted.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Workspace resolution failed.
    #[error(transparent)]
    Workspace(#[from] twenty_config::ConfigError),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else {
            Error::Request(err.to_string())
        }
    }
}

impl Error {
    /// HTTP status code, for status errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Status { status: 404, .. })
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Status { status: 401 | 403, .. })
    }

    /// Check if this is a rate limit error.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Error::Status { status: 429, .. })
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::Status { status, .. } if *status >= 500)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout)
    }

    /// Check if this came from the workspace registry rather than the backend.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Error::Workspace(_) | Error::Config(_) | Error::InvalidUrl(_) | Error::UnsupportedMethod(_)
        )
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = Error::Status {
            status: 404,
            body: r#"{"message":"Record not found"}"#.to_string(),
        };
        assert_eq!(err.status(), Some(404));
        assert!(err.is_not_found());
        assert!(!err.is_server_error());
        assert_eq!(err.to_string(), r#"HTTP 404: {"message":"Record not found"}"#);
    }

    #[test]
    fn test_status_predicates() {
        let status = |status| Error::Status {
            status,
            body: String::new(),
        };
        assert!(status(401).is_auth_error());
        assert!(status(403).is_auth_error());
        assert!(status(429).is_rate_limited());
        assert!(status(502).is_server_error());
        assert!(!status(400).is_server_error());
    }

    #[test]
    fn test_timeout_is_distinct() {
        let err = Error::Timeout;
        assert!(err.is_timeout());
        assert_eq!(err.status(), None);
        assert_eq!(
            err.to_string(),
            "Request timeout - API took too long to respond"
        );
        assert!(!Error::Request("connection refused".to_string()).is_timeout());
    }

    #[test]
    fn test_workspace_error_conversion() {
        let err: Error = twenty_config::ConfigError::NoWorkspaces.into();
        assert!(err.is_config_error());
        assert_eq!(err.to_string(), "no workspaces are configured");
    }
}
