//! IBM Cloud Client
//!
//! Main client for interacting with IBM Cloud APIs, combining authentication,
//! HTTP transport and the optional read-through cache.

use super::auth::{AccessToken, Credentials};
use super::cache::{self, CacheBackend, MemcachedCache};
use super::http::{Auth, Body, HttpClient, RawResponse};
use crate::config::{Config, Connection};
use crate::error::{Error, Result};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use url::Url;
use uuid::Uuid;

/// Content type IaaS expects on PATCH
const MERGE_PATCH: &str = "application/merge-patch+json";

/// A request against one of the API connections
#[derive(Debug, Clone)]
pub struct Query {
    pub connection: Connection,
    pub method: Method,
    pub path: String,
    pub params: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Body>,
    /// Whether a GET may be served from or stored in the cache
    pub cache: bool,
}

impl Query {
    pub fn new(connection: Connection, method: Method, path: impl Into<String>) -> Self {
        Self {
            connection,
            method,
            path: path.into(),
            params: Vec::new(),
            headers: Vec::new(),
            body: None,
            cache: true,
        }
    }

    pub fn get(connection: Connection, path: impl Into<String>) -> Self {
        Self::new(connection, Method::GET, path)
    }

    pub fn post(connection: Connection, path: impl Into<String>) -> Self {
        Self::new(connection, Method::POST, path)
    }

    pub fn put(connection: Connection, path: impl Into<String>) -> Self {
        Self::new(connection, Method::PUT, path)
    }

    pub fn patch(connection: Connection, path: impl Into<String>) -> Self {
        Self::new(connection, Method::PATCH, path)
    }

    pub fn delete(connection: Connection, path: impl Into<String>) -> Self {
        Self::new(connection, Method::DELETE, path)
    }

    /// Always send this request to the API. Used for GETs that change state.
    pub fn uncached(mut self) -> Self {
        self.cache = false;
        self
    }

    pub fn param(mut self, name: &str, value: &str) -> Self {
        self.params.push((name.to_string(), value.to_string()));
        self
    }

    pub fn params(mut self, params: &[(String, String)]) -> Self {
        self.params.extend_from_slice(params);
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn headers(mut self, headers: &[(String, String)]) -> Self {
        self.headers.extend_from_slice(headers);
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(if self.method == Method::PATCH && self.connection == Connection::Iaas {
            Body::Raw {
                content_type: MERGE_PATCH.to_string(),
                bytes: body.to_string().into_bytes(),
            }
        } else {
            Body::Json(body)
        });
        self
    }

    pub fn bytes(mut self, content_type: &str, bytes: Vec<u8>) -> Self {
        self.body = Some(Body::Raw {
            content_type: content_type.to_string(),
            bytes,
        });
        self
    }
}

/// Result of a query: status plus the parsed body when it is JSON
#[derive(Debug, Clone)]
pub struct QueryResponse {
    pub status: StatusCode,
    pub data: Option<Value>,
    pub bytes: Vec<u8>,
    /// True when served from the cache
    pub cached: bool,
}

impl QueryResponse {
    fn from_raw(raw: RawResponse) -> Self {
        Self {
            status: raw.status,
            data: raw.json(),
            bytes: raw.bytes,
            cached: false,
        }
    }

    fn from_cached(text: String) -> Self {
        Self {
            status: StatusCode::OK,
            data: serde_json::from_str(&text).ok(),
            bytes: text.into_bytes(),
            cached: true,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Turn a non-success status into `Error::Api`
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::from_response(self.status, self.data))
        }
    }

    /// Parsed body, `Value::Null` when empty
    pub fn into_data(self) -> Value {
        self.data.unwrap_or(Value::Null)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// Main IBM Cloud client
#[derive(Clone)]
pub struct IbmClient {
    config: Arc<Config>,
    credentials: Credentials,
    http: HttpClient,
    cache: Option<Arc<dyn CacheBackend>>,
}

impl IbmClient {
    /// Create a new client. Connects to memcached when nodes are configured.
    pub async fn new(config: Config) -> Result<Self> {
        let mut client = Self::without_cache(config)?;

        if !client.config.memcached.is_empty() {
            let cache = MemcachedCache::connect(&client.config.memcached).await?;
            client.cache = Some(Arc::new(cache));
        }

        Ok(client)
    }

    /// Create a client that never caches
    pub fn without_cache(config: Config) -> Result<Self> {
        let http = HttpClient::new(config.timeout)?;
        let credentials = Credentials::new(
            &config.api_key,
            &config.base_url(Connection::Auth),
            http.clone(),
        );

        Ok(Self {
            config: Arc::new(config),
            credentials,
            http,
            cache: None,
        })
    }

    /// Use the given cache backend for GET requests
    pub fn with_cache(mut self, cache: Arc<dyn CacheBackend>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn region(&self) -> &str {
        &self.config.region
    }

    /// Get the current access token
    pub async fn get_token(&self) -> Result<AccessToken> {
        self.credentials.get_token().await
    }

    /// Force a token refresh
    pub async fn refresh_token(&self) -> Result<AccessToken> {
        self.credentials.refresh_token().await
    }

    /// Build the full URL for a path on a connection.
    /// IaaS URLs always carry `version` and `generation`.
    pub fn url(&self, connection: Connection, path: &str, params: &[(String, String)]) -> Result<Url> {
        let base = self.config.base_url(connection);
        let mut url = Url::parse(&format!("{}/{}", base, path.trim_start_matches('/')))?;

        {
            let mut pairs = url.query_pairs_mut();
            if connection == Connection::Iaas {
                pairs.append_pair("version", &self.config.version);
                pairs.append_pair("generation", &self.config.generation);
            }
            for (name, value) in params {
                pairs.append_pair(name, value);
            }
        }

        if url.query() == Some("") {
            url.set_query(None);
        }

        Ok(url)
    }

    /// Perform a query.
    ///
    /// Returns whatever status the API answered with; use
    /// [`QueryResponse::error_for_status`] or the typed helpers to get errors
    /// for non-success statuses.
    pub async fn query(&self, query: Query) -> Result<QueryResponse> {
        let url = self.url(query.connection, &query.path, &query.params)?;

        let cacheable = self.cache.is_some()
            && query.cache
            && query.method == Method::GET
            && query.connection != Connection::Auth;

        let cache_key = if cacheable {
            let account = self.cache_account(query.connection).await?;
            Some(cache::cache_key(&account, &path_and_query(&url)))
        } else {
            None
        };

        if let (Some(cache), Some(key)) = (&self.cache, &cache_key) {
            match cache.get(key).await {
                Ok(Some(hit)) => {
                    tracing::debug!("Cache hit for {}", url.path());
                    return Ok(QueryResponse::from_cached(hit));
                },
                Ok(None) => tracing::debug!("Cache miss for {}", url.path()),
                Err(e) => tracing::warn!("Cache read failed: {}", e),
            }
        }

        let mut headers = query.headers.clone();
        headers.push(("X-Request-ID".to_string(), Uuid::new_v4().to_string()));

        let mut raw = self.send(&query, &url, &headers).await?;

        if raw.status == StatusCode::UNAUTHORIZED && uses_bearer(query.connection) {
            tracing::warn!("Token rejected by {}, refreshing and retrying once", query.connection);
            self.credentials.refresh_token().await?;
            raw = self.send(&query, &url, &headers).await?;
        }

        let response = QueryResponse::from_raw(raw);

        if let (Some(cache), Some(key)) = (&self.cache, &cache_key) {
            if response.is_success() {
                if let Ok(text) = std::str::from_utf8(&response.bytes) {
                    if let Err(e) = cache.set(key, text, self.config.cache_ttl).await {
                        tracing::warn!("Cache write failed: {}", e);
                    }
                }
            }
        }

        Ok(response)
    }

    async fn send(&self, query: &Query, url: &Url, headers: &[(String, String)]) -> Result<RawResponse> {
        let token;
        let auth = match query.connection {
            Connection::Auth => Auth::None,
            Connection::Sl => {
                let (username, password) = self.softlayer_credentials()?;
                Auth::Basic { username, password }
            },
            _ => {
                token = self.credentials.get_token().await?.token;
                Auth::Bearer(&token)
            },
        };

        self.http
            .send(query.method.clone(), url.as_str(), auth, headers, query.body.as_ref())
            .await
    }

    fn softlayer_credentials(&self) -> Result<(&str, &str)> {
        match (&self.config.sl_username, &self.config.sl_api_key) {
            (Some(username), Some(api_key)) => Ok((username.as_str(), api_key.as_str())),
            _ => Err(Error::Config(
                "SL_USERNAME and SL_API_KEY are required for classic infrastructure".to_string(),
            )),
        }
    }

    async fn cache_account(&self, connection: Connection) -> Result<String> {
        if connection == Connection::Sl {
            return Ok(self.softlayer_credentials()?.0.to_string());
        }
        let token = self.credentials.get_token().await?;
        Ok(token.account_id.unwrap_or_else(|| "anonymous".to_string()))
    }

    // =========================================================================
    // Checked helpers
    // =========================================================================

    /// GET a path and return the parsed body
    pub async fn get(&self, connection: Connection, path: &str) -> Result<Value> {
        let response = self.query(Query::get(connection, path)).await?;
        Ok(response.error_for_status()?.into_data())
    }

    /// GET a path without going through the cache
    pub async fn get_uncached(&self, connection: Connection, path: &str) -> Result<Value> {
        let response = self.query(Query::get(connection, path).uncached()).await?;
        Ok(response.error_for_status()?.into_data())
    }

    /// POST a JSON body and return the parsed response
    pub async fn post(&self, connection: Connection, path: &str, body: Value) -> Result<Value> {
        let response = self.query(Query::post(connection, path).json(body)).await?;
        Ok(response.error_for_status()?.into_data())
    }

    /// PUT a JSON body and return the parsed response
    pub async fn put(&self, connection: Connection, path: &str, body: Value) -> Result<Value> {
        let response = self.query(Query::put(connection, path).json(body)).await?;
        Ok(response.error_for_status()?.into_data())
    }

    /// PATCH a JSON body and return the parsed response
    pub async fn patch(&self, connection: Connection, path: &str, body: Value) -> Result<Value> {
        let response = self.query(Query::patch(connection, path).json(body)).await?;
        Ok(response.error_for_status()?.into_data())
    }

    /// DELETE a path. Returns the raw response so callers can check the status.
    pub async fn delete(&self, connection: Connection, path: &str) -> Result<QueryResponse> {
        self.query(Query::delete(connection, path)).await
    }
}

fn uses_bearer(connection: Connection) -> bool {
    !matches!(connection, Connection::Auth | Connection::Sl)
}

fn path_and_query(url: &Url) -> String {
    match url.query() {
        Some(q) => format!("{}?{}", url.path(), q),
        None => url.path().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> IbmClient {
        let config = Config::new("key", "us-south", "2021-01-12", "2")
            .with_endpoint(Connection::Rg, "http://localhost:8080/v2");
        IbmClient::without_cache(config).unwrap()
    }

    #[test]
    fn test_iaas_url_carries_version_and_generation() {
        let url = client().url(Connection::Iaas, "vpcs", &[]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://us-south.iaas.cloud.ibm.com/v1/vpcs?version=2021-01-12&generation=2"
        );
    }

    #[test]
    fn test_url_without_params_has_no_query() {
        let url = client().url(Connection::Rg, "/resource_groups", &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/v2/resource_groups");
    }

    #[test]
    fn test_url_appends_params() {
        let params = vec![("start".to_string(), "abc".to_string())];
        let url = client().url(Connection::Rg, "resource_instances", &params).unwrap();
        assert_eq!(url.query(), Some("start=abc"));
    }

    #[test]
    fn test_iaas_patch_uses_merge_patch() {
        let query = Query::patch(Connection::Iaas, "vpcs/1").json(serde_json::json!({"name": "x"}));
        match query.body {
            Some(Body::Raw { content_type, .. }) => assert_eq!(content_type, MERGE_PATCH),
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn test_queries_are_cacheable_unless_marked() {
        assert!(Query::get(Connection::Sl, "SoftLayer_Account/getHardware").cache);
        assert!(!Query::get(Connection::Sl, "SoftLayer_Hardware_Server/1/powerOn").uncached().cache);
    }

    #[test]
    fn test_softlayer_requires_credentials() {
        assert!(matches!(client().softlayer_credentials(), Err(Error::Config(_))));
    }
}
