//! Metadata API.

use serde_json::Value;

use crate::client::TwentyClient;
use crate::error::Result;

/// Metadata API client (`/rest/metadata/objects`).
pub struct MetadataApi {
    client: TwentyClient,
}

impl MetadataApi {
    pub(crate) fn new(client: TwentyClient) -> Self {
        Self { client }
    }

    /// List every object defined in the workspace.
    pub async fn objects(&self) -> Result<Value> {
        self.client.get(&["metadata", "objects"]).await
    }

    /// Get the schema of one object.
    pub async fn object_schema(&self, object: &str) -> Result<Value> {
        self.client
            .get(&["metadata", "objects", object])
            .await
    }

    /// Get the fields of one object.
    pub async fn fields(&self, object: &str) -> Result<Value> {
        self.client
            .get(&["metadata", "objects", object, "fields"])
            .await
    }
}
