//! Tool handlers returning JSON envelopes.
//!
//! Every handler resolves its workspace through the shared
//! [`ClientManager`], performs one client call, and wraps the outcome:
//!
//! - success: `{"success": true, <key>: <payload>}` or
//!   `{"success": true, "message": "..."}` for mutations
//! - failure: `{"error": "Failed to <action>: <message>"}`, or
//!   `{"error": "Unexpected error: <message>"}` when the workspace could not
//!   be resolved
//!
//! Handlers never return `Err`; every failure is folded into the envelope.

use std::sync::Arc;

use serde_json::{Map, Value, json};
use twenty_client::{
    ClientManager, ComplexSearch, ListQuery, OrderDirection, SearchFilter, TwentyClient,
};

use crate::entity::Entity;
use crate::error::{Result, ToolError};

/// Handler set shared by every tool and resource.
#[derive(Debug, Clone)]
pub struct CrmTools {
    manager: Arc<ClientManager>,
}

impl CrmTools {
    pub fn new(manager: Arc<ClientManager>) -> Self {
        Self { manager }
    }

    pub fn manager(&self) -> &ClientManager {
        &self.manager
    }

    pub(crate) fn client(&self, workspace: Option<&str>) -> Result<TwentyClient> {
        Ok(self.manager.get_client(workspace)?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Records
    // ─────────────────────────────────────────────────────────────────────────

    /// Fetch one record: `{"success": true, "<singular>": record}`.
    pub async fn get_record(&self, entity: Entity, id: &str, workspace: Option<&str>) -> Value {
        let outcome = async {
            let client = self.client(workspace)?;
            Ok::<_, ToolError>(client.records(entity.object()).get(id).await?)
        }
        .await;

        envelope(outcome, &format!("get {}", entity.singular()), |record| {
            success_with(entity.singular(), record)
        })
    }

    /// List a page of records: `{"success": true, "<plural>": result}`.
    pub async fn list_records(
        &self,
        entity: Entity,
        limit: u32,
        offset: u32,
        workspace: Option<&str>,
    ) -> Value {
        let outcome = async {
            let client = self.client(workspace)?;
            let query = ListQuery::new(limit, offset);
            Ok::<_, ToolError>(client.records(entity.object()).list(&query).await?)
        }
        .await;

        envelope(outcome, &format!("get {}", entity.object()), |result| {
            success_with(entity.object(), result)
        })
    }

    pub async fn create_record(&self, entity: Entity, data: &Value, workspace: Option<&str>) -> Value {
        let outcome = async {
            let client = self.client(workspace)?;
            Ok::<_, ToolError>(client.records(entity.object()).create(data).await?)
        }
        .await;

        envelope(outcome, &format!("create {}", entity.singular()), |result| {
            success_message(
                format!("{} created successfully", entity.label()),
                Some((entity.singular(), result)),
            )
        })
    }

    pub async fn update_record(
        &self,
        entity: Entity,
        id: &str,
        data: &Value,
        workspace: Option<&str>,
    ) -> Value {
        let outcome = async {
            let client = self.client(workspace)?;
            Ok::<_, ToolError>(client.records(entity.object()).update(id, data).await?)
        }
        .await;

        envelope(outcome, &format!("update {}", entity.singular()), |result| {
            success_message(
                format!("{} {} updated successfully", entity.label(), id),
                Some((entity.singular(), result)),
            )
        })
    }

    pub async fn delete_record(&self, entity: Entity, id: &str, workspace: Option<&str>) -> Value {
        let outcome = async {
            let client = self.client(workspace)?;
            Ok::<_, ToolError>(client.records(entity.object()).delete(id).await?)
        }
        .await;

        envelope(outcome, &format!("delete {}", entity.singular()), |_| {
            success_message(
                format!("{} {} deleted successfully", entity.label(), id),
                None,
            )
        })
    }

    /// Free-text search: `{"success": true, "results": result}`.
    pub async fn search_basic(
        &self,
        entity: Entity,
        query: &str,
        limit: u32,
        workspace: Option<&str>,
    ) -> Value {
        let outcome = async {
            ensure_searchable(entity)?;
            let client = self.client(workspace)?;
            Ok::<_, ToolError>(client.records(entity.object()).search(query, limit).await?)
        }
        .await;

        envelope(outcome, &format!("search {}", entity.object()), |result| {
            success_with("results", result)
        })
    }

    /// Filtered search. `order_direction` is parsed case-insensitively and
    /// only sent when `order_by` is set.
    pub async fn search_complex(
        &self,
        entity: Entity,
        filters: Vec<SearchFilter>,
        limit: u32,
        order_by: Option<&str>,
        order_direction: &str,
        workspace: Option<&str>,
    ) -> Value {
        let outcome = async {
            ensure_searchable(entity)?;
            let direction: OrderDirection = order_direction.parse()?;
            let mut search = ComplexSearch::new(filters).limit(limit);
            if let Some(field) = order_by {
                search = search.order_by(field, direction);
            }
            let client = self.client(workspace)?;
            Ok::<_, ToolError>(client.records(entity.object()).search_complex(&search).await?)
        }
        .await;

        envelope(outcome, &format!("search {}", entity.object()), |result| {
            success_with("results", result)
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Metadata
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn get_objects(&self, workspace: Option<&str>) -> Value {
        let outcome = async {
            let client = self.client(workspace)?;
            Ok::<_, ToolError>(client.metadata().objects().await?)
        }
        .await;

        envelope(outcome, "get objects", |result| success_with("objects", result))
    }

    pub async fn get_object_schema(&self, object_name: &str, workspace: Option<&str>) -> Value {
        let outcome = async {
            let client = self.client(workspace)?;
            Ok::<_, ToolError>(client.metadata().object_schema(object_name).await?)
        }
        .await;

        envelope(outcome, "get object schema", |result| {
            success_with("schema", result)
        })
    }

    pub async fn get_fields(&self, object_name: &str, workspace: Option<&str>) -> Value {
        let outcome = async {
            let client = self.client(workspace)?;
            Ok::<_, ToolError>(client.metadata().fields(object_name).await?)
        }
        .await;

        envelope(outcome, "get fields", |result| success_with("fields", result))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Workspaces
    // ─────────────────────────────────────────────────────────────────────────

    /// `{"workspaces": [names...], "default": name}`.
    pub fn list_workspaces(&self) -> Value {
        json!({
            "workspaces": self.manager.get_all_workspaces(),
            "default": self.manager.default_workspace(),
        })
    }

    /// `{"name", "base_url", "is_default"}` for a workspace, or an error
    /// envelope naming the available workspaces.
    pub fn get_workspace_info(&self, workspace: Option<&str>) -> Value {
        let registry = self.manager.registry();
        match registry.get_workspace(workspace) {
            Ok(ws) => json!({
                "name": ws.name(),
                "base_url": ws.base_url(),
                "is_default": registry.default_workspace() == Some(ws.name()),
            }),
            Err(e) => json!({ "error": e.to_string() }),
        }
    }
}

fn ensure_searchable(entity: Entity) -> Result<()> {
    if entity.supports_search() {
        Ok(())
    } else {
        Err(ToolError::Unsupported {
            entity: entity.object(),
            operation: "search",
        })
    }
}

fn envelope(outcome: Result<Value>, action: &str, on_success: impl FnOnce(Value) -> Value) -> Value {
    match outcome {
        Ok(result) => on_success(result),
        Err(e) => failure(&e, action),
    }
}

pub(crate) fn failure(err: &ToolError, action: &str) -> Value {
    tracing::warn!(action, error = %err, "tool call failed");
    let message = if err.is_config_error() {
        format!("Unexpected error: {}", err)
    } else {
        format!("Failed to {}: {}", action, err)
    };
    json!({ "error": message })
}

fn success_with(key: &str, payload: Value) -> Value {
    let mut map = Map::new();
    map.insert("success".to_string(), Value::Bool(true));
    map.insert(key.to_string(), payload);
    Value::Object(map)
}

fn success_message(message: String, record: Option<(&str, Value)>) -> Value {
    let mut map = Map::new();
    map.insert("success".to_string(), Value::Bool(true));
    map.insert("message".to_string(), Value::String(message));
    if let Some((key, record)) = record {
        map.insert(key.to_string(), record);
    }
    Value::Object(map)
}
