use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, COOKIE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::{Result, TransportError};
use crate::http_client::HttpUtils;
use crate::traits::Transport;
use crate::types::{ListQuery, PaginatedResponse, RecordId};

/// Header carrying the tenant (organization) the session acts for.
pub const TENANT_HEADER: &str = "x-tenant-id";

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    2
}

/// Connection settings for [`HttpTransport`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpTransportConfig {
    /// API root, e.g. `https://api.example.com/v1/`.
    pub base_url: String,
    /// Sent as `Authorization: Bearer <token>`.
    #[serde(default)]
    pub bearer_token: Option<String>,
    /// Forwarded verbatim as the `Cookie` header.
    #[serde(default)]
    pub cookie: Option<String>,
    /// Forwarded as [`TENANT_HEADER`].
    #[serde(default)]
    pub tenant: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Retries for idempotent calls (list, delete). Create and update never retry.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl HttpTransportConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            bearer_token: None,
            cookie: None,
            tenant: None,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

/// `reqwest`-backed [`Transport`] speaking the backend's JSON REST dialect.
///
/// - `GET {base}/{endpoint}?limit=&offset=&<filters>` → `{"items": [...], "total": n}`
/// - `POST {base}/{endpoint}`
/// - `PUT {base}/{endpoint}/{id}`
/// - `DELETE {base}/{endpoint}/{id}`
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    max_retries: u32,
}

impl HttpTransport {
    /// Build a transport; fails on a malformed base URL or header value.
    pub fn new(config: &HttpTransportConfig) -> Result<Self> {
        let mut base_url = Url::parse(&config.base_url).map_err(|e| TransportError::InvalidConfig {
            detail: format!("Invalid base URL '{}': {e}", config.base_url),
        })?;
        // Url::join drops the last segment unless the path ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .default_headers(default_headers(config)?)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TransportError::InvalidConfig {
                detail: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url,
            max_retries: config.max_retries,
        })
    }

    fn url(&self, endpoint: &str, id: Option<RecordId>) -> Result<Url> {
        let path = match id {
            Some(id) => format!("{}/{id}", endpoint.trim_matches('/')),
            None => endpoint.trim_matches('/').to_string(),
        };
        self.base_url
            .join(&path)
            .map_err(|e| TransportError::InvalidConfig {
                detail: format!("Invalid endpoint '{endpoint}': {e}"),
            })
    }

    async fn send_json(
        &self,
        request: RequestBuilder,
        method: &str,
        url: &Url,
        max_retries: u32,
    ) -> Result<Value> {
        let body =
            HttpUtils::execute_request_with_retry(request, method, url.as_str(), max_retries)
                .await?;
        match body {
            Some(text) => HttpUtils::parse_json(&text),
            None => Err(TransportError::Parse {
                detail: format!("{method} {url} returned no body"),
            }),
        }
    }
}

fn default_headers(config: &HttpTransportConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    if let Some(token) = &config.bearer_token {
        headers.insert(AUTHORIZATION, header_value(&format!("Bearer {token}"))?);
    }
    if let Some(cookie) = &config.cookie {
        headers.insert(COOKIE, header_value(cookie)?);
    }
    if let Some(tenant) = &config.tenant {
        headers.insert(HeaderName::from_static(TENANT_HEADER), header_value(tenant)?);
    }
    Ok(headers)
}

fn header_value(raw: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(raw).map_err(|e| TransportError::InvalidConfig {
        detail: format!("Invalid header value: {e}"),
    })?;
    value.set_sensitive(true);
    Ok(value)
}

#[async_trait]
impl Transport for HttpTransport {
    async fn list(&self, endpoint: &str, query: &ListQuery) -> Result<PaginatedResponse<Value>> {
        let url = self.url(endpoint, None)?;
        let request = self.client.get(url.clone()).query(&query.to_pairs());
        let body = self.send_json(request, "GET", &url, self.max_retries).await?;
        serde_json::from_value(body).map_err(|e| TransportError::Parse {
            detail: format!("Unexpected list response from {url}: {e}"),
        })
    }

    async fn create(&self, endpoint: &str, body: Value) -> Result<Value> {
        let url = self.url(endpoint, None)?;
        let request = self.client.post(url.clone()).json(&body);
        self.send_json(request, "POST", &url, 0).await
    }

    async fn update(&self, endpoint: &str, id: RecordId, body: Value) -> Result<Value> {
        let url = self.url(endpoint, Some(id))?;
        let request = self.client.put(url.clone()).json(&body);
        self.send_json(request, "PUT", &url, 0).await
    }

    async fn delete(&self, endpoint: &str, id: RecordId) -> Result<()> {
        let url = self.url(endpoint, Some(id))?;
        let request = self.client.delete(url.clone());
        // Whatever body a delete returns is ignored
        HttpUtils::execute_request_with_retry(request, "DELETE", url.as_str(), self.max_retries)
            .await
            .map(|_| ())
    }
}
