//! Authenticated JSON client for the Anymailfinder API.
//!
//! [`ApiClient`] is the only seam between the node and the network: perform
//! a method + path + optional JSON body with credentials attached, return the
//! parsed JSON or fail on a non-2xx status.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::ApiConfig;
use crate::credentials::Credentials;
use crate::error::{Error, Result};

/// A single API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: &'static str,
    pub body: Option<Value>,
}

/// "Authenticated JSON request" capability.
#[async_trait]
pub trait ApiClient: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<Value>;
}

/// Where the client gets its credential from.
enum CredentialSource {
    Fixed(Credentials),
    /// Resolved from config or environment on every request, so a missing
    /// key fails the item rather than the client.
    Resolve(ApiConfig),
}

impl CredentialSource {
    fn credentials(&self) -> Result<Credentials> {
        match self {
            CredentialSource::Fixed(credentials) => Ok(credentials.clone()),
            CredentialSource::Resolve(config) => Credentials::from_config(config),
        }
    }
}

/// reqwest-backed [`ApiClient`].
pub struct HttpApiClient {
    client: Client,
    base_url: String,
    credentials: CredentialSource,
}

impl HttpApiClient {
    pub fn new(config: &ApiConfig, credentials: Credentials) -> Result<Self> {
        Self::build(config, CredentialSource::Fixed(credentials))
    }

    /// Build a client whose credential is resolved from config or
    /// environment when each request is sent.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Self::build(config, CredentialSource::Resolve(config.clone()))
    }

    fn build(config: &ApiConfig, credentials: CredentialSource) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn send(&self, request: &ApiRequest) -> Result<Value> {
        let url = self.url(request.path);
        debug!("Anymailfinder {} {}", request.method, url);

        let credentials = self.credentials.credentials().map_err(|e| {
            warn!("Anymailfinder {} {} not sent: {}", request.method, url, e);
            e
        })?;

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .header(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        builder = credentials.apply(builder);

        let start = Instant::now();
        let response = builder.send().await?;
        let status = response.status();

        let body_text = response.text().await.map_err(|e| {
            Error::InvalidResponse(format!("Failed to read response body from {}: {}", url, e))
        })?;
        let duration = start.elapsed();

        if !status.is_success() {
            warn!(
                "Anymailfinder {} {} -> {} ({}ms)",
                request.method,
                url,
                status.as_u16(),
                duration.as_millis()
            );
            return Err(Error::Api {
                status: status.as_u16(),
                body: body_text,
            });
        }

        info!(
            "Anymailfinder {} {} -> {} ({}ms)",
            request.method,
            url,
            status.as_u16(),
            duration.as_millis()
        );

        if body_text.trim().is_empty() {
            return Ok(Value::Object(Default::default()));
        }

        serde_json::from_str(&body_text).map_err(|e| {
            Error::InvalidResponse(format!(
                "{} {} returned non-JSON body: {}",
                request.method, url, e
            ))
        })
    }
}
