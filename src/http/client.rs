//! HTTP client for the Star Gallery backend
//!
//! Provides a thin client that handles:
//! - Joining endpoint paths onto the configured base URL
//! - JSON and multipart request bodies
//! - Response body parsing
//! - Error classification (network, HTTP status, validation, not found)
//!
//! Requests are sent exactly once; nothing is retried.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::types::UploadFile;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL for all requests
    pub base_url: String,
    /// Request timeout (`None` = transport default)
    pub timeout: Option<Duration>,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self::from(&ClientConfig::default())
    }
}

impl From<&ClientConfig> for HttpClientConfig {
    fn from(config: &ClientConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout: config.timeout(),
            default_headers: config.headers.clone(),
            user_agent: config.user_agent.clone(),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Request body variants
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// JSON document
    Json(Value),
    /// `multipart/form-data` with one part per file, all under `field`
    Multipart {
        field: String,
        files: Vec<UploadFile>,
    },
}

/// Configuration for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters
    pub query: Vec<(String, String)>,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Request body
    pub body: Option<RequestBody>,
    /// Override timeout for this request
    pub timeout: Option<Duration>,
}

impl RequestConfig {
    /// Create a new request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    /// Set a multipart body with every file under the same field name
    #[must_use]
    pub fn multipart(mut self, field: impl Into<String>, files: Vec<UploadFile>) -> Self {
        self.body = Some(RequestBody::Multipart {
            field: field.into(),
            files,
        });
        self
    }

    /// Set timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// HTTP client bound to one backend
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    base_url: Url,
}

impl HttpClient {
    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::config(format!(
                "base URL '{}' cannot carry a path",
                config.base_url
            )));
        }

        let mut builder = Client::builder().user_agent(&config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            base_url,
        })
    }

    /// Create a client from the crate-level configuration
    pub fn from_client_config(config: &ClientConfig) -> Result<Self> {
        Self::with_config(HttpClientConfig::from(config))
    }

    /// Build an endpoint URL from path segments
    ///
    /// Each segment is percent-encoded, so opaque ids can never escape
    /// their position in the path.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Send a request and return the successful response
    pub async fn request(&self, method: Method, url: Url, config: RequestConfig) -> Result<Response> {
        let mut req = self.client.request(method.clone(), url.clone());

        // Add default headers
        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }

        // Add request-specific headers
        for (key, value) in &config.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if !config.query.is_empty() {
            req = req.query(&config.query);
        }

        match config.body {
            Some(RequestBody::Json(ref body)) => {
                req = req.json(body);
            }
            Some(RequestBody::Multipart { ref field, ref files }) => {
                req = req.multipart(build_form(field, files)?);
            }
            None => {}
        }

        if let Some(timeout) = config.timeout {
            req = req.timeout(timeout);
        }

        debug!("Sending {} {}", method, url);
        let response = req.send().await.map_err(Error::Network)?;
        let status = response.status();

        if status.is_success() {
            debug!("Request succeeded: {} {} -> {}", method, url, status.as_u16());
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!("Request failed: {} {} -> {}", method, url, status.as_u16());
        Err(Error::from_status(status.as_u16(), &body))
    }

    /// Send a request and parse the JSON response
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        config: RequestConfig,
    ) -> Result<T> {
        let response = self.request(method, url, config).await?;
        let bytes = response.bytes().await.map_err(Error::Network)?;
        serde_json::from_slice(&bytes).map_err(|e| Error::decode(e.to_string()))
    }

    /// Make a GET request and parse JSON response
    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        self.request_json(Method::GET, url, RequestConfig::default())
            .await
    }

    /// Make a GET request with config and parse JSON response
    pub async fn get_json_with_config<T: DeserializeOwned>(
        &self,
        url: Url,
        config: RequestConfig,
    ) -> Result<T> {
        self.request_json(Method::GET, url, config).await
    }

    /// Make a POST request with a JSON body and parse JSON response
    pub async fn post_json<T: DeserializeOwned>(&self, url: Url, body: Value) -> Result<T> {
        self.request_json(Method::POST, url, RequestConfig::default().json(body))
            .await
    }

    /// Make a PUT request with a JSON body and parse JSON response
    pub async fn put_json<T: DeserializeOwned>(&self, url: Url, body: Value) -> Result<T> {
        self.request_json(Method::PUT, url, RequestConfig::default().json(body))
            .await
    }

    /// Make a DELETE request, discarding any response body
    pub async fn delete(&self, url: Url) -> Result<()> {
        self.request(Method::DELETE, url, RequestConfig::default())
            .await?;
        Ok(())
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Build a multipart form with one part per file
fn build_form(field: &str, files: &[UploadFile]) -> Result<Form> {
    let mut form = Form::new();
    for file in files {
        let part = Part::bytes(file.content.to_vec())
            .file_name(file.filename.clone())
            .mime_str(&file.mime_type)
            .map_err(|_| {
                Error::validation(format!(
                    "{} has an invalid MIME type '{}'",
                    file.filename, file.mime_type
                ))
            })?;
        form = form.part(field.to_string(), part);
    }
    Ok(form)
}
