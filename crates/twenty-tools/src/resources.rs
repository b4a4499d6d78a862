//! Read-only text resources.
//!
//! | URI | Content |
//! |-----|---------|
//! | `people://list`, `companies://list`, `opportunities://list` | Directory of up to 100 records |
//! | `people://{id}`, `companies://{id}`, `opportunities://{id}` | Single record profile |
//! | `schema://objects` | Object catalogue |
//!
//! Resources always read the default workspace. Backend failures are rendered
//! into the text (`Error retrieving ...`) rather than returned as errors.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use twenty_client::ListQuery;

use crate::entity::Entity;
use crate::error::{Result, ToolError};
use crate::tools::CrmTools;

/// Page size for directory resources.
pub const DIRECTORY_LIMIT: u32 = 100;

/// A parsed resource address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceUri {
    /// `<plural>://list`
    Directory(Entity),
    /// `<plural>://{id}`
    Profile(Entity, String),
    /// `schema://objects`
    SchemaObjects,
}

impl ResourceUri {
    fn resource_entity(scheme: &str) -> Option<Entity> {
        Entity::from_object(scheme).filter(|e| {
            matches!(e, Entity::People | Entity::Companies | Entity::Opportunities)
        })
    }
}

impl FromStr for ResourceUri {
    type Err = ToolError;

    fn from_str(uri: &str) -> Result<Self> {
        let unknown = || ToolError::UnknownResource(uri.to_string());
        let (scheme, rest) = uri.split_once("://").ok_or_else(unknown)?;

        if scheme == "schema" {
            return if rest == "objects" {
                Ok(ResourceUri::SchemaObjects)
            } else {
                Err(unknown())
            };
        }

        let entity = Self::resource_entity(scheme).ok_or_else(unknown)?;
        match rest {
            "list" => Ok(ResourceUri::Directory(entity)),
            "" | "." | ".." => Err(unknown()),
            id if !id.contains(['/', '?', '#']) => {
                Ok(ResourceUri::Profile(entity, id.to_string()))
            }
            _ => Err(unknown()),
        }
    }
}

impl fmt::Display for ResourceUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceUri::Directory(entity) => write!(f, "{}://list", entity.object()),
            ResourceUri::Profile(entity, id) => write!(f, "{}://{}", entity.object(), id),
            ResourceUri::SchemaObjects => f.write_str("schema://objects"),
        }
    }
}

impl CrmTools {
    /// Render a resource. Fails only when the URI is not recognised.
    pub async fn read_resource(&self, uri: &str) -> Result<String> {
        let text = match uri.parse::<ResourceUri>()? {
            ResourceUri::Directory(entity) => self.directory(entity).await,
            ResourceUri::Profile(entity, id) => self.profile(entity, &id).await,
            ResourceUri::SchemaObjects => self.schema_objects().await,
        };
        Ok(text)
    }

    /// Directory listing of up to [`DIRECTORY_LIMIT`] records.
    pub async fn directory(&self, entity: Entity) -> String {
        let outcome = async {
            let client = self.client(None)?;
            let query = ListQuery::new(DIRECTORY_LIMIT, 0);
            Ok::<_, ToolError>(client.records(entity.object()).list(&query).await?)
        }
        .await;

        match outcome {
            Ok(result) => render_directory(entity, &result),
            Err(e) => {
                tracing::warn!(entity = %entity, error = %e, "directory resource failed");
                format!("Error retrieving {}: {}", entity.object(), e)
            }
        }
    }

    /// Profile of a single record.
    pub async fn profile(&self, entity: Entity, id: &str) -> String {
        let outcome = async {
            let client = self.client(None)?;
            Ok::<_, ToolError>(client.records(entity.object()).get(id).await?)
        }
        .await;

        match outcome {
            Ok(result) => render_profile(entity, id, &result),
            Err(e) => {
                tracing::warn!(entity = %entity, id, error = %e, "profile resource failed");
                format!("Error retrieving {} {}: {}", entity.singular(), id, e)
            }
        }
    }

    /// Catalogue of workspace objects.
    pub async fn schema_objects(&self) -> String {
        let outcome = async {
            let client = self.client(None)?;
            Ok::<_, ToolError>(client.metadata().objects().await?)
        }
        .await;

        match outcome {
            Ok(result) => render_objects(&result),
            Err(e) => {
                tracing::warn!(error = %e, "schema resource failed");
                format!("Error retrieving schema: {}", e)
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rendering
// ─────────────────────────────────────────────────────────────────────────────

/// Records under `data.<plural>`.
fn record_list<'a>(result: &'a Value, key: &str) -> &'a [Value] {
    result["data"][key]
        .as_array()
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Single record under `data.find<Singular>`, `data.<singular>`, or `data`.
fn single_record(entity: Entity, result: &Value) -> Option<&Value> {
    let data = &result["data"];
    let record = [data.get(entity.find_key()), data.get(entity.singular())]
        .into_iter()
        .flatten()
        .next()
        .unwrap_or(data);

    match record {
        Value::Object(map) if !map.is_empty() => Some(record),
        _ => None,
    }
}

/// First non-empty scalar at any of the dotted paths.
fn text(record: &Value, paths: &[&str]) -> Option<String> {
    paths.iter().find_map(|path| {
        let value = path
            .split('.')
            .try_fold(record, |value, key| value.get(key))?;
        match value {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    })
}

fn or(value: Option<String>, fallback: &str) -> String {
    value.unwrap_or_else(|| fallback.to_string())
}

fn person_name(person: &Value) -> String {
    ["firstName", "lastName"]
        .into_iter()
        .filter_map(|part| {
            let nested = format!("name.{}", part);
            text(person, &[part, nested.as_str()])
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn email(person: &Value) -> Option<String> {
    text(person, &["email", "primaryEmail", "emails.primaryEmail"])
}

fn city(record: &Value) -> Option<String> {
    text(record, &["city", "address.addressCity"])
}

fn domain(company: &Value) -> Option<String> {
    text(company, &["domainName", "domainName.primaryLinkUrl"])
}

/// `(amount, currency)`, reading both flat and currency-object shapes.
fn amount(opportunity: &Value) -> (String, String) {
    let micros = opportunity["amount"]["amountMicros"].as_f64();
    let amount = match micros {
        Some(micros) => (micros / 1_000_000.0).to_string(),
        None => or(text(opportunity, &["amount"]), "0"),
    };
    let currency = or(
        text(opportunity, &["currency", "amount.currencyCode"]),
        "USD",
    );
    (amount, currency)
}

fn company_line(record: &Value) -> Option<String> {
    match &record["company"] {
        Value::Object(company) if !company.is_empty() => Some(format!(
            "\nCompany: {}\n",
            or(text(&record["company"], &["name"]), "Unknown")
        )),
        _ => None,
    }
}

/// Render a directory listing from a list response.
pub fn render_directory(entity: Entity, result: &Value) -> String {
    let records = record_list(result, entity.object());
    if records.is_empty() {
        return format!("No {} found in the workspace.", entity.object());
    }

    let title = match entity {
        Entity::People => "People",
        Entity::Companies => "Companies",
        _ => "Opportunities",
    };
    let mut out = format!("{} Directory ({} records):\n\n", title, records.len());

    for record in records {
        let id = or(text(record, &["id"]), "Unknown");
        match entity {
            Entity::People => {
                out.push_str(&format!(
                    "• {} ({})\n  ID: {}, City: {}\n\n",
                    person_name(record),
                    or(email(record), "No email"),
                    id,
                    or(city(record), "No city"),
                ));
            }
            Entity::Companies => {
                out.push_str(&format!(
                    "• {} ({})\n  ID: {}, City: {}\n\n",
                    or(text(record, &["name"]), "Unknown"),
                    or(domain(record), "No domain"),
                    id,
                    or(city(record), "No city"),
                ));
            }
            _ => {
                let (amount, currency) = amount(record);
                out.push_str(&format!(
                    "• {} ({} {})\n  ID: {}, Stage: {}\n\n",
                    or(text(record, &["name"]), "Unknown"),
                    currency,
                    amount,
                    id,
                    or(text(record, &["stage"]), "No stage"),
                ));
            }
        }
    }

    out.trim_end().to_string()
}

/// Render a record profile from a get response.
pub fn render_profile(entity: Entity, id: &str, result: &Value) -> String {
    let Some(record) = single_record(entity, result) else {
        return format!("{} {} not found.", entity.label(), id);
    };

    let record_id = or(text(record, &["id"]), "Unknown");
    let created = or(text(record, &["createdAt"]), "Unknown");
    let mut out = match entity {
        Entity::People => format!(
            "Person Profile - {}\nID: {}\nEmail: {}\nPhone: {}\nCity: {}\nCreated: {}\n",
            person_name(record),
            record_id,
            or(email(record), "Not specified"),
            or(
                text(record, &["phone", "phones.primaryPhoneNumber"]),
                "Not specified"
            ),
            or(city(record), "Not specified"),
            created,
        ),
        Entity::Companies => format!(
            "Company Profile - {}\nID: {}\nDomain: {}\nCity: {}\nEmployees: {}\nCreated: {}\n",
            or(text(record, &["name"]), "Unknown"),
            record_id,
            or(domain(record), "Not specified"),
            or(city(record), "Not specified"),
            or(text(record, &["employees"]), "Not specified"),
            created,
        ),
        _ => {
            let (amount, currency) = amount(record);
            format!(
                "Opportunity Profile - {}\nID: {}\nStage: {}\nAmount: {} {}\nProbability: {}%\nExpected Close: {}\nCreated: {}\n",
                or(text(record, &["name"]), "Unknown"),
                record_id,
                or(text(record, &["stage"]), "Not specified"),
                amount,
                currency,
                or(text(record, &["probability"]), "Not specified"),
                or(
                    text(record, &["expectedCloseDate", "closeDate"]),
                    "Not specified"
                ),
                created,
            )
        }
    };

    if entity != Entity::Companies {
        if let Some(line) = company_line(record) {
            out.push_str(&line);
        }
    }
    out
}

/// Render the object catalogue from a metadata response.
pub fn render_objects(result: &Value) -> String {
    let objects = record_list(result, "objects");
    if objects.is_empty() {
        return "No objects found in the workspace.".to_string();
    }

    let mut out = format!(
        "Workspace Schema - Objects ({} total):\n\n",
        objects.len()
    );
    for object in objects {
        out.push_str(&format!(
            "• {} ({})\n  Plural: {}\n  Description: {}\n\n",
            or(text(object, &["nameSingular"]), "Unknown"),
            or(text(object, &["labelSingular"]), "Unknown"),
            or(text(object, &["namePlural"]), "Unknown"),
            or(text(object, &["description"]), "No description"),
        ));
    }
    out.trim_end().to_string()
}
