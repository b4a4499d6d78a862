//! Records API: CRUD and search over one object collection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::TwentyClient;
use crate::error::{Error, Result};

/// Default page size for listing and searching.
pub const DEFAULT_LIMIT: u32 = 20;

/// Filter operators the Twenty REST API documents. Others are passed through
/// to the backend with a warning.
pub const KNOWN_FILTER_OPERATORS: &[&str] = &[
    "eq", "neq", "like", "ilike", "gt", "gte", "lt", "lte", "in", "isNull", "isNotNull",
];

// ─────────────────────────────────────────────────────────────────────────────
// Query types
// ─────────────────────────────────────────────────────────────────────────────

/// Pagination and extra query parameters for listing records.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub limit: u32,
    pub offset: u32,
    /// Extra query parameters merged into the request. A key named `limit`
    /// or `offset` overrides the pagination value.
    pub filters: Map<String, Value>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
            filters: Map::new(),
        }
    }
}

impl ListQuery {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self {
            limit,
            offset,
            filters: Map::new(),
        }
    }

    /// Add an extra query parameter.
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// Flatten into query pairs. Strings are sent raw, other values as JSON
    /// text.
    pub(crate) fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(2 + self.filters.len());
        if !self.filters.contains_key("limit") {
            pairs.push(("limit".to_string(), self.limit.to_string()));
        }
        if !self.filters.contains_key("offset") {
            pairs.push(("offset".to_string(), self.offset.to_string()));
        }
        for (key, value) in &self.filters {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            pairs.push((key.clone(), value));
        }
        pairs
    }
}

#[derive(Serialize)]
struct SearchQuery<'a> {
    query: &'a str,
    limit: u32,
}

/// One condition of a complex search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchFilter {
    pub field: String,
    #[serde(default = "default_operator")]
    pub operator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

fn default_operator() -> String {
    "eq".to_string()
}

impl SearchFilter {
    pub fn new(
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value: Some(value.into()),
        }
    }

    /// Filter without a value (`isNull`, `isNotNull`).
    pub fn unary(field: impl Into<String>, operator: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value: None,
        }
    }

    pub fn is_known_operator(&self) -> bool {
        KNOWN_FILTER_OPERATORS.contains(&self.operator.as_str())
    }
}

/// Sort direction for complex search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

impl FromStr for OrderDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" => Ok(OrderDirection::Asc),
            "DESC" => Ok(OrderDirection::Desc),
            _ => Err(Error::InvalidArgument(format!(
                "order direction must be ASC or DESC, got '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filtered, ordered search expressed as a filter list.
///
/// Sent as `{"filter": {"and": [...]}, "limit": n}` plus `orderBy` and
/// `orderDirection` when an order field is set.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexSearch {
    pub filters: Vec<SearchFilter>,
    pub limit: u32,
    pub order_by: Option<String>,
    pub order_direction: OrderDirection,
}

impl ComplexSearch {
    pub fn new(filters: Vec<SearchFilter>) -> Self {
        Self {
            filters,
            limit: DEFAULT_LIMIT,
            order_by: None,
            order_direction: OrderDirection::default(),
        }
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: OrderDirection) -> Self {
        self.order_by = Some(field.into());
        self.order_direction = direction;
        self
    }

    pub(crate) fn request_body(&self) -> ComplexSearchBody<'_> {
        let order_by = self.order_by.as_deref();
        ComplexSearchBody {
            filter: FilterGroup {
                and: &self.filters,
            },
            limit: self.limit,
            order_by,
            order_direction: order_by.map(|_| self.order_direction),
        }
    }
}

#[derive(Serialize)]
pub(crate) struct ComplexSearchBody<'a> {
    filter: FilterGroup<'a>,
    limit: u32,
    #[serde(rename = "orderBy", skip_serializing_if = "Option::is_none")]
    order_by: Option<&'a str>,
    #[serde(rename = "orderDirection", skip_serializing_if = "Option::is_none")]
    order_direction: Option<OrderDirection>,
}

#[derive(Serialize)]
struct FilterGroup<'a> {
    and: &'a [SearchFilter],
}

// ─────────────────────────────────────────────────────────────────────────────
// Records API
// ─────────────────────────────────────────────────────────────────────────────

/// Records API client for one object (`/rest/{object}`).
pub struct RecordsApi {
    client: TwentyClient,
    object: String,
}

impl RecordsApi {
    pub(crate) fn new(client: TwentyClient, object: String) -> Self {
        Self { client, object }
    }

    /// Object name this API addresses.
    pub fn object(&self) -> &str {
        &self.object
    }

    /// Get a record by ID.
    pub async fn get(&self, id: &str) -> Result<Value> {
        self.client.get(&[self.object.as_str(), id]).await
    }

    /// List records with pagination and optional extra query parameters.
    pub async fn list(&self, query: &ListQuery) -> Result<Value> {
        self.client
            .get_with_query(&[self.object.as_str()], &query.to_pairs())
            .await
    }

    /// Create a record.
    pub async fn create(&self, data: &Value) -> Result<Value> {
        self.client.post(&[self.object.as_str()], data).await
    }

    /// Update a record.
    pub async fn update(&self, id: &str, data: &Value) -> Result<Value> {
        self.client.patch(&[self.object.as_str(), id], data).await
    }

    /// Delete a record.
    pub async fn delete(&self, id: &str) -> Result<Value> {
        self.client.delete(&[self.object.as_str(), id]).await
    }

    /// Free-text search.
    pub async fn search(&self, query: &str, limit: u32) -> Result<Value> {
        let query = SearchQuery { query, limit };
        self.client
            .get_with_query(&[self.object.as_str(), "search"], &query)
            .await
    }

    /// Structured search. Operators are not validated locally.
    pub async fn search_complex(&self, search: &ComplexSearch) -> Result<Value> {
        for filter in search.filters.iter().filter(|f| !f.is_known_operator()) {
            tracing::warn!(
                object = %self.object,
                field = %filter.field,
                operator = %filter.operator,
                "unknown filter operator, passing through to backend"
            );
        }

        self.client
            .post(&[self.object.as_str(), "search"], &search.request_body())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_query_pairs() {
        let query = ListQuery::new(50, 100)
            .with_filter("city", "Paris")
            .with_filter("employees", 10);
        let pairs = query.to_pairs();
        assert_eq!(
            pairs,
            vec![
                ("limit".to_string(), "50".to_string()),
                ("offset".to_string(), "100".to_string()),
                ("city".to_string(), "Paris".to_string()),
                ("employees".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn test_list_query_filter_overrides_pagination() {
        let query = ListQuery::default().with_filter("limit", 5);
        let pairs = query.to_pairs();
        assert_eq!(
            pairs,
            vec![
                ("offset".to_string(), "0".to_string()),
                ("limit".to_string(), "5".to_string()),
            ]
        );
    }

    #[test]
    fn test_complex_search_body_with_order() {
        let search = ComplexSearch::new(vec![SearchFilter::new("city", "eq", "New York")])
            .limit(20)
            .order_by("createdAt", OrderDirection::Desc);
        let body = serde_json::to_value(search.request_body()).unwrap();
        assert_eq!(
            body,
            json!({
                "filter": {"and": [{"field": "city", "operator": "eq", "value": "New York"}]},
                "limit": 20,
                "orderBy": "createdAt",
                "orderDirection": "DESC"
            })
        );
    }

    #[test]
    fn test_complex_search_body_without_order() {
        let search = ComplexSearch::new(vec![SearchFilter::unary("email", "isNull")]);
        let body = serde_json::to_value(search.request_body()).unwrap();
        assert_eq!(
            body,
            json!({
                "filter": {"and": [{"field": "email", "operator": "isNull"}]},
                "limit": 20
            })
        );
    }

    #[test]
    fn test_search_filter_deserialize_defaults() {
        let filter: SearchFilter =
            serde_json::from_value(json!({"field": "name", "value": "Acme"})).unwrap();
        assert_eq!(filter.operator, "eq");
        assert!(filter.is_known_operator());

        let filter = SearchFilter::new("name", "fuzzy", "Acme");
        assert!(!filter.is_known_operator());
    }

    #[test]
    fn test_order_direction_parse() {
        assert_eq!("desc".parse::<OrderDirection>().unwrap(), OrderDirection::Desc);
        assert_eq!("ASC".parse::<OrderDirection>().unwrap(), OrderDirection::Asc);
        assert!(matches!(
            "sideways".parse::<OrderDirection>(),
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(OrderDirection::default(), OrderDirection::Asc);
    }
}
