//! Workspace registry: the set of configured backends and default resolution.

use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::workspace::{DEFAULT_WORKSPACE_NAME, Workspace, WorkspacesDeclaration};
use crate::{ConfigError, Result};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ─────────────────────────────────────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────────────────────────────────────

/// Settings shared by every workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Config source
// ─────────────────────────────────────────────────────────────────────────────

/// Raw configuration handed over by the host.
///
/// Carries the two supported shapes: a multi-workspace declaration, or a
/// single base URL + API key pair. When both are present the declaration
/// wins. Empty strings count as absent.
#[derive(Clone, Default)]
pub struct ConfigSource {
    pub workspaces: Option<WorkspacesDeclaration>,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub settings: Settings,
}

impl ConfigSource {
    /// Single-workspace shape.
    pub fn single(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    /// Multi-workspace shape.
    pub fn multi(declaration: WorkspacesDeclaration) -> Self {
        Self {
            workspaces: Some(declaration),
            ..Default::default()
        }
    }

    /// Override the request timeout.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.settings.timeout_secs = timeout_secs;
        self
    }
}

impl fmt::Debug for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigSource")
            .field("workspaces", &self.workspaces)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("settings", &self.settings)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────────────────────────────────────

/// Validated, ordered set of workspaces. The first workspace is the default.
#[derive(Debug, Clone)]
pub struct WorkspaceRegistry {
    workspaces: Vec<Workspace>,
    settings: Settings,
}

impl WorkspaceRegistry {
    /// Build the registry from whichever shape `source` carries.
    pub fn from_source(source: ConfigSource) -> Result<Self> {
        let ConfigSource {
            workspaces,
            base_url,
            api_key,
            settings,
        } = source;

        let registry = if let Some(declaration) = workspaces {
            Self::from_declaration(declaration)?
        } else {
            let base_url = base_url.filter(|s| !s.is_empty());
            let api_key = api_key.filter(|s| !s.is_empty());
            match (base_url, api_key) {
                (Some(base_url), Some(api_key)) => Self::single(base_url, api_key)?,
                _ => return Err(ConfigError::MissingConfiguration),
            }
        };

        Ok(registry.with_settings(settings))
    }

    /// One workspace named `"default"`.
    pub fn single(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let workspace = Workspace::new(DEFAULT_WORKSPACE_NAME, base_url, api_key);
        workspace.validate()?;
        tracing::debug!(base_url = %workspace.base_url(), "loaded single workspace");
        Ok(Self {
            workspaces: vec![workspace],
            settings: Settings::default(),
        })
    }

    /// Every entry of the declaration, in order. Rejects empty lists,
    /// duplicate names and incomplete entries.
    pub fn from_declaration(declaration: WorkspacesDeclaration) -> Result<Self> {
        if declaration.workspaces.is_empty() {
            return Err(ConfigError::EmptyWorkspaceList);
        }

        let mut seen = HashSet::new();
        let mut workspaces = Vec::with_capacity(declaration.workspaces.len());
        for entry in declaration.workspaces {
            let workspace = Workspace::from(entry);
            workspace.validate()?;
            if !seen.insert(workspace.name().to_string()) {
                return Err(ConfigError::DuplicateWorkspace(workspace.name().to_string()));
            }
            workspaces.push(workspace);
        }

        tracing::debug!(count = workspaces.len(), "loaded workspaces declaration");
        Ok(Self {
            workspaces,
            settings: Settings::default(),
        })
    }

    /// Replace the shared settings.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Resolve a workspace by name, or the default when `name` is `None`.
    pub fn get_workspace(&self, name: Option<&str>) -> Result<&Workspace> {
        match name {
            None => self.workspaces.first().ok_or(ConfigError::NoWorkspaces),
            Some(name) => self
                .workspaces
                .iter()
                .find(|w| w.name() == name)
                .ok_or_else(|| ConfigError::WorkspaceNotFound {
                    name: name.to_string(),
                    available: self.get_all_workspaces().join(", "),
                }),
        }
    }

    /// Workspace names in configuration order.
    pub fn get_all_workspaces(&self) -> Vec<&str> {
        self.workspaces.iter().map(|w| w.name()).collect()
    }

    /// Name of the workspace used when none is requested.
    pub fn default_workspace(&self) -> Option<&str> {
        self.workspaces.first().map(|w| w.name())
    }

    /// Check if a workspace is configured.
    pub fn contains(&self, name: &str) -> bool {
        self.workspaces.iter().any(|w| w.name() == name)
    }

    pub fn len(&self) -> usize {
        self.workspaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workspaces.is_empty()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Shared request timeout.
    pub fn timeout(&self) -> Duration {
        self.settings.timeout()
    }
}
