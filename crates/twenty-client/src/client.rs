//! Main client implementation.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde_json::{Value, json};
use twenty_config::{DEFAULT_TIMEOUT_SECS, Workspace};
use url::Url;

use crate::api::{MetadataApi, RecordsApi};
use crate::error::{Error, Result};
use crate::method::HttpMethod;

/// Default timeout for requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECS);

/// Path prefix of the Twenty REST API.
const REST_PREFIX: &str = "rest/";

/// Twenty CRM REST client bound to one workspace.
///
/// Every operation performs exactly one HTTP round trip and returns the
/// backend's JSON untouched. Clones share the same connection pool.
///
/// # Example
///
/// ```no_run
/// use twenty_client::TwentyClient;
///
/// # async fn example() -> twenty_client::Result<()> {
/// let client = TwentyClient::builder()
///     .base_url("https://crm.example.com")
///     .api_key("secret")
///     .build()?;
///
/// let person = client.records("people").get("123").await?;
/// let objects = client.metadata().objects().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TwentyClient {
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
struct ClientInner {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
    workspace: Option<String>,
}

impl TwentyClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Build a client for a configured workspace.
    pub fn for_workspace(workspace: &Workspace, timeout: Duration) -> Result<Self> {
        Self::builder()
            .base_url(workspace.base_url())
            .api_key(workspace.api_key())
            .workspace(workspace.name())
            .timeout(timeout)
            .build()
    }

    /// Get the base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Name of the workspace this client is bound to, if any.
    pub fn workspace(&self) -> Option<&str> {
        self.inner.workspace.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        self.inner.timeout
    }

    /// True when both handles share the same underlying client.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access record CRUD and search for one object (e.g. `"people"`).
    pub fn records(&self, object: impl Into<String>) -> RecordsApi {
        RecordsApi::new(self.clone(), object.into())
    }

    /// Access the metadata API.
    pub fn metadata(&self) -> MetadataApi {
        MetadataApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal HTTP methods
    // ─────────────────────────────────────────────────────────────────────────

    /// Build a URL under `/rest/` from path segments.
    ///
    /// Segments are percent-encoded individually, so `/`, `?`, `#` and `%`
    /// inside an id stay inside that segment. Empty, `.` and `..` segments are
    /// rejected.
    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url> {
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            return Err(Error::InvalidArgument(format!(
                "invalid path segment '{}'",
                bad
            )));
        }

        let mut url = self.inner.base_url.join(REST_PREFIX)?;
        url.path_segments_mut()
            .map_err(|_| {
                Error::Config(format!(
                    "base URL cannot carry a path: {}",
                    self.inner.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn execute(
        &self,
        method: HttpMethod,
        segments: &[&str],
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<Value> {
        let url = self.url(segments)?;
        let path = url.path().to_string();
        let builder = self
            .inner
            .http
            .request(method.into(), url)
            .timeout(self.inner.timeout);
        self.send(method, &path, build(builder)).await
    }

    /// Make a GET request.
    pub(crate) async fn get(&self, segments: &[&str]) -> Result<Value> {
        self.execute(HttpMethod::Get, segments, |b| b).await
    }

    /// Make a GET request with query parameters.
    pub(crate) async fn get_with_query<Q>(&self, segments: &[&str], query: &Q) -> Result<Value>
    where
        Q: serde::Serialize + ?Sized,
    {
        self.execute(HttpMethod::Get, segments, |b| b.query(query))
            .await
    }

    /// Make a POST request.
    pub(crate) async fn post<B>(&self, segments: &[&str], body: &B) -> Result<Value>
    where
        B: serde::Serialize + ?Sized,
    {
        self.execute(HttpMethod::Post, segments, |b| b.json(body))
            .await
    }

    /// Make a PATCH request.
    pub(crate) async fn patch<B>(&self, segments: &[&str], body: &B) -> Result<Value>
    where
        B: serde::Serialize + ?Sized,
    {
        self.execute(HttpMethod::Patch, segments, |b| b.json(body))
            .await
    }

    /// Make a DELETE request.
    pub(crate) async fn delete(&self, segments: &[&str]) -> Result<Value> {
        self.execute(HttpMethod::Delete, segments, |b| b).await
    }

    async fn send(&self, method: HttpMethod, path: &str, builder: RequestBuilder) -> Result<Value> {
        let workspace = self.workspace().unwrap_or("-");
        tracing::debug!(workspace, %method, path, "sending request");

        let response = builder.send().await.map_err(|e| {
            let err = Error::from(e);
            tracing::error!(workspace, %method, path, error = %err, "request failed");
            err
        })?;

        self.handle_response(method, path, response).await
    }

    /// Normalize a response: errors for non-2xx, `{"success": true}` for
    /// 204 or an empty body, parsed JSON otherwise.
    async fn handle_response(
        &self,
        method: HttpMethod,
        path: &str,
        response: Response,
    ) -> Result<Value> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await?;
            tracing::error!(
                workspace = self.workspace().unwrap_or("-"),
                %method,
                path,
                status = status.as_u16(),
                "HTTP error"
            );
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(success_ack());
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(success_ack());
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Acknowledgement returned for bodiless responses.
fn success_ack() -> Value {
    json!({ "success": true })
}

impl fmt::Debug for TwentyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwentyClient")
            .field("workspace", &self.inner.workspace)
            .field("base_url", &self.inner.base_url.as_str())
            .field("timeout", &self.inner.timeout)
            .finish_non_exhaustive()
    }
}

/// Builder for creating a TwentyClient.
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    workspace: Option<String>,
    timeout: Duration,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            workspace: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the base URL of the Twenty instance.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the API key sent as a bearer token.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Tag the client with a workspace name (used in logs).
    pub fn workspace(mut self, name: impl Into<String>) -> Self {
        self.workspace = Some(name.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<TwentyClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::Config("base_url is required".to_string()))?;
        let api_key = self
            .api_key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::Config("api_key is required".to_string()))?;

        // Parse and normalize base URL
        let mut base_url = Url::parse(&base_url)?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        // Build default headers
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|_| Error::Config("Invalid API key".to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let user_agent = format!("twenty-client/{}", env!("CARGO_PKG_VERSION"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(TwentyClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                timeout: self.timeout,
                workspace: self.workspace,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
