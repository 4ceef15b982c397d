//! Credential handling for the Anymailfinder API.
//!
//! The API key is resolved when a request is sent and attached to it. The key is zeroized when dropped and never
//! printed by `Debug`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::config::ApiConfig;
use crate::error::{Error, Result};

/// Name under which hosts register this credential.
pub const CREDENTIAL_NAME: &str = "anymailFinderApi";

/// Environment variables consulted for the API key, in order.
const API_KEY_ENV_VARS: [&str; 2] = ["ANYMAILFINDER_API_KEY", "AMF_API_KEY"];

/// Secure container for the API key that zeroizes on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(Error::Credential("API key is empty".to_string()));
        }
        Ok(Self(key))
    }

    /// Resolve the key from config, falling back to the environment.
    pub fn resolve(config: &ApiConfig) -> Result<Self> {
        if let Some(key) = config.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            return Self::new(key);
        }

        for var in API_KEY_ENV_VARS {
            if let Ok(key) = std::env::var(var) {
                if !key.trim().is_empty() {
                    return Self::new(key);
                }
            }
        }

        Err(Error::Credential(format!(
            "No API key configured for '{}'. Set api.api_key or {}",
            CREDENTIAL_NAME, API_KEY_ENV_VARS[0]
        )))
    }

    fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

/// How the API key is attached to a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AuthScheme {
    /// `Authorization: Bearer <key>`
    #[default]
    Bearer,
    /// `<name>: <key>`
    Header(String),
}

impl FromStr for AuthScheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "bearer" => Ok(AuthScheme::Bearer),
            other if other.starts_with("header:") => {
                let header_name = other["header:".len()..].trim();
                if header_name.is_empty() {
                    return Err(Error::Config(
                        "header: auth_scheme must specify a header name".to_string(),
                    ));
                }
                Ok(AuthScheme::Header(header_name.to_string()))
            }
            _ => Err(Error::Config(format!(
                "Unknown auth_scheme '{}'. Use: bearer or header:<name>",
                s
            ))),
        }
    }
}

impl TryFrom<String> for AuthScheme {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<AuthScheme> for String {
    fn from(scheme: AuthScheme) -> Self {
        match scheme {
            AuthScheme::Bearer => "bearer".to_string(),
            AuthScheme::Header(name) => format!("header:{}", name),
        }
    }
}

/// A resolved credential: key plus the scheme used to send it.
#[derive(Debug, Clone)]
pub struct Credentials {
    key: ApiKey,
    scheme: AuthScheme,
}

impl Credentials {
    pub fn new(key: ApiKey, scheme: AuthScheme) -> Self {
        Self { key, scheme }
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Ok(Self::new(ApiKey::resolve(config)?, config.auth_scheme.clone()))
    }

    /// Attach the credential to a request.
    pub fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.scheme {
            AuthScheme::Bearer => request.bearer_auth(self.key.expose()),
            AuthScheme::Header(name) => request.header(name.as_str(), self.key.expose()),
        }
    }
}
