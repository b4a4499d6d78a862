//! Workspace definitions and the multi-workspace declaration format.
//!
//! A declaration lists named workspaces in order; the first entry becomes the
//! default:
//!
//! ```yaml
//! workspaces:
//!   - name: sales
//!     base_url: https://crm.example.com
//!     api_key: sk-sales
//!   - name: support
//!     base_url: https://support.example.com/
//!     api_key: sk-support
//! ```
//!
//! The same structure is accepted as JSON (`{"workspaces": [...]}`).

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result};

/// Name given to the workspace built from a single base URL + API key pair,
/// and to declaration entries that omit a name.
pub const DEFAULT_WORKSPACE_NAME: &str = "default";

// ─────────────────────────────────────────────────────────────────────────────
// Workspace
// ─────────────────────────────────────────────────────────────────────────────

/// One configured Twenty CRM tenant.
#[derive(Clone, PartialEq, Eq)]
pub struct Workspace {
    name: String,
    base_url: String,
    api_key: String,
}

impl Workspace {
    /// Create a workspace. Trailing slashes are stripped from `base_url`.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            name: name.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Check the workspace, naming the first missing field.
    pub(crate) fn validate(&self) -> Result<()> {
        let reason = if self.name.is_empty() {
            "name is empty"
        } else if self.base_url.is_empty() {
            "base_url is empty"
        } else if self.api_key.is_empty() {
            "api_key is empty"
        } else {
            return Ok(());
        };
        Err(ConfigError::InvalidWorkspace {
            name: self.name.clone(),
            reason: reason.to_string(),
        })
    }
}

impl fmt::Debug for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workspace")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Declaration
// ─────────────────────────────────────────────────────────────────────────────

/// Ordered list of named workspaces.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkspacesDeclaration {
    pub workspaces: Vec<WorkspaceEntry>,
}

/// A single entry of a [`WorkspacesDeclaration`].
#[derive(Clone, Serialize, Deserialize)]
pub struct WorkspaceEntry {
    #[serde(default = "default_entry_name")]
    pub name: String,
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
}

fn default_entry_name() -> String {
    DEFAULT_WORKSPACE_NAME.to_string()
}

impl fmt::Debug for WorkspaceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkspaceEntry")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl WorkspaceEntry {
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

impl From<WorkspaceEntry> for Workspace {
    fn from(entry: WorkspaceEntry) -> Self {
        Workspace::new(entry.name, entry.base_url, entry.api_key)
    }
}

impl WorkspacesDeclaration {
    pub fn new(workspaces: Vec<WorkspaceEntry>) -> Self {
        Self { workspaces }
    }

    /// Parse from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a declaration file. `.json` files are parsed as JSON, anything
    /// else as YAML.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.display().to_string(),
            source: e,
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&contents),
            _ => Self::from_yaml(&contents),
        }
    }

    /// Names in declaration order.
    pub fn names(&self) -> Vec<&str> {
        self.workspaces.iter().map(|w| w.name.as_str()).collect()
    }
}
