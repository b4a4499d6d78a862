//! Tool and resource handlers for Twenty CRM.
//!
//! [`CrmTools`] holds the shared [`twenty_client::ClientManager`] and exposes
//! one handler per tool a protocol host binds: record CRUD and search for each
//! [`Entity`], schema metadata, and workspace discovery. Handlers return JSON
//! envelopes; resources return plain text.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use twenty_client::ClientManager;
//! use twenty_config::{ConfigSource, WorkspaceRegistry};
//! use twenty_tools::{CrmTools, Entity};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = WorkspaceRegistry::from_source(ConfigSource::single(
//!     "https://crm.example.com",
//!     "secret",
//! ))?;
//! let tools = CrmTools::new(Arc::new(ClientManager::new(registry)));
//!
//! let envelope = tools.get_record(Entity::People, "123", None).await;
//! let directory = tools.read_resource("companies://list").await?;
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod resources;
pub mod tools;

pub use entity::Entity;
pub use error::{Result, ToolError};
pub use resources::{DIRECTORY_LIMIT, ResourceUri, render_directory, render_objects, render_profile};
pub use tools::CrmTools;
