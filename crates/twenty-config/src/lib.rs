//! Workspace registry for the Twenty CRM adapter.
//!
//! Holds the set of configured backend workspaces (name, base URL, API key),
//! resolves the default one when a caller does not name a workspace, and
//! validates configuration up front. Two configuration shapes are accepted:
//!
//! - a single workspace given as a base URL + API key pair (named `default`)
//! - an ordered multi-workspace declaration (JSON or YAML), whose first entry
//!   is the default
//!
//! ```
//! use twenty_config::{ConfigSource, WorkspaceRegistry, WorkspacesDeclaration};
//!
//! let declaration = WorkspacesDeclaration::from_json(
//!     r#"{"workspaces": [{"name": "sales", "base_url": "https://crm.example.com", "api_key": "sk"}]}"#,
//! )?;
//! let registry = WorkspaceRegistry::from_source(ConfigSource::multi(declaration))?;
//! assert_eq!(registry.get_workspace(None)?.name(), "sales");
//! # Ok::<(), twenty_config::ConfigError>(())
//! ```

pub mod error;
pub mod registry;
pub mod workspace;

pub use error::{ConfigError, Result};
pub use registry::{ConfigSource, DEFAULT_TIMEOUT_SECS, Settings, WorkspaceRegistry};
pub use workspace::{DEFAULT_WORKSPACE_NAME, Workspace, WorkspaceEntry, WorkspacesDeclaration};
