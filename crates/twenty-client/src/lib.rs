//! REST client for Twenty CRM workspaces.
//!
//! [`TwentyClient`] maps each logical CRM operation onto exactly one
//! authenticated HTTP request and hands back the backend's JSON as an opaque
//! [`serde_json::Value`]. [`ClientManager`] resolves workspace names through a
//! [`twenty_config::WorkspaceRegistry`] and caches one client per workspace.
//!
//! # Example
//!
//! ```no_run
//! use twenty_client::{ComplexSearch, OrderDirection, Result, SearchFilter, TwentyClient};
//!
//! # async fn example() -> Result<()> {
//! let client = TwentyClient::builder()
//!     .base_url("https://crm.example.com")
//!     .api_key("secret")
//!     .build()?;
//!
//! let people = client.records("people");
//! let person = people.get("123").await?;
//!
//! let search = ComplexSearch::new(vec![SearchFilter::new("city", "eq", "New York")])
//!     .limit(20)
//!     .order_by("createdAt", OrderDirection::Desc);
//! let results = people.search_complex(&search).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # API Coverage
//!
//! - **Records** (`/rest/{object}`): get, list, create, update, delete,
//!   free-text search, filter search
//! - **Metadata** (`/rest/metadata/objects`): objects, object schema, fields
//!
//! Responses with status 204 or an empty body come back as
//! `{"success": true}`. Non-2xx statuses become [`Error::Status`] carrying
//! the raw body; timeouts become [`Error::Timeout`]. Nothing is retried.

pub mod api;
pub mod client;
pub mod error;
pub mod manager;
pub mod method;

pub use api::{
    ComplexSearch, DEFAULT_LIMIT, KNOWN_FILTER_OPERATORS, ListQuery, MetadataApi,
    OrderDirection, RecordsApi, SearchFilter,
};
pub use client::{ClientBuilder, TwentyClient};
pub use error::{Error, Result};
pub use manager::ClientManager;
pub use method::HttpMethod;
