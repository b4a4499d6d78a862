//! Client manager: one cached [`TwentyClient`] per configured workspace.
//!
//! # Example
//!
//! ```no_run
//! use twenty_client::ClientManager;
//! use twenty_config::{ConfigSource, WorkspaceRegistry};
//!
//! # async fn example() -> twenty_client::Result<()> {
//! let registry = WorkspaceRegistry::from_source(ConfigSource::single(
//!     "https://crm.example.com",
//!     "secret",
//! ))?;
//! let manager = ClientManager::new(registry);
//!
//! // Default workspace
//! let client = manager.get_client(None)?;
//! let people = client.records("people").list(&Default::default()).await?;
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;

use parking_lot::RwLock;
use twenty_config::WorkspaceRegistry;

use crate::client::TwentyClient;
use crate::error::Result;

/// Owns the workspace registry and the clients built from it.
///
/// Clients are created on first use and live as long as the manager. Two
/// callers racing on the first use of a workspace may both build a client;
/// only the first insert is kept and both receive it.
#[derive(Debug)]
pub struct ClientManager {
    registry: WorkspaceRegistry,
    clients: RwLock<HashMap<String, TwentyClient>>,
}

impl ClientManager {
    /// Create a manager with no clients built yet.
    pub fn new(registry: WorkspaceRegistry) -> Self {
        Self {
            registry,
            clients: RwLock::new(HashMap::new()),
        }
    }

    pub fn registry(&self) -> &WorkspaceRegistry {
        &self.registry
    }

    /// Get or create the client for a workspace (`None` = default).
    pub fn get_client(&self, workspace: Option<&str>) -> Result<TwentyClient> {
        let workspace = self.registry.get_workspace(workspace)?;

        if let Some(client) = self.clients.read().get(workspace.name()) {
            return Ok(client.clone());
        }

        let client = TwentyClient::for_workspace(workspace, self.registry.timeout())?;
        let mut clients = self.clients.write();
        let client = clients
            .entry(workspace.name().to_string())
            .or_insert_with(|| {
                tracing::info!(workspace = %workspace.name(), "created Twenty client");
                client
            })
            .clone();

        Ok(client)
    }

    /// Names of all configured workspaces, in configuration order.
    pub fn get_all_workspaces(&self) -> Vec<&str> {
        self.registry.get_all_workspaces()
    }

    /// Name of the default workspace.
    pub fn default_workspace(&self) -> Option<&str> {
        self.registry.default_workspace()
    }

    /// Names of workspaces with a client already built.
    pub fn cached_workspaces(&self) -> Vec<String> {
        self.clients.read().keys().cloned().collect()
    }

    /// Check if a client has been built for a workspace.
    pub fn is_cached(&self, workspace: &str) -> bool {
        self.clients.read().contains_key(workspace)
    }
}
