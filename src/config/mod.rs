//! Configuration management.
//!
//! Configuration can come from:
//! - Environment variables (AMF_*, ANYMAILFINDER_API_KEY)
//! - Config file (~/.config/anymailfinder/config.toml)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::credentials::AuthScheme;
use crate::error::{Error, Result};

/// Base host of the Anymailfinder REST API.
pub const DEFAULT_BASE_URL: &str = "https://api.anymailfinder.com";

/// Node configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Anymailfinder API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Batch execution configuration
    #[serde(default)]
    pub execution: ExecutionConfig,
}

/// API client configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Connect timeout (seconds)
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,

    /// How the API key is attached to requests
    #[serde(default)]
    pub auth_scheme: AuthScheme,

    /// API key. Falls back to ANYMAILFINDER_API_KEY when unset.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("connect_timeout_seconds", &self.connect_timeout_seconds)
            .field("auth_scheme", &self.auth_scheme)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
            auth_scheme: AuthScheme::default(),
            api_key: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

/// Batch execution configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Turn per-item failures into `{error}` records instead of aborting
    #[serde(default)]
    pub continue_on_fail: bool,

    /// Maximum number of items in flight at once (1 = sequential)
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            continue_on_fail: false,
            max_concurrency: default_max_concurrency(),
        }
    }
}

fn default_max_concurrency() -> usize {
    1
}

impl Config {
    /// Load configuration from default locations.
    pub fn load() -> Self {
        let mut config = Self::default();

        let primary_path = Self::config_dir().join("config.toml");
        if let Ok(partial) = Self::load_partial_from_path(&primary_path) {
            config.apply_partial(partial);
        }

        config.apply_env_overrides();
        config
    }

    /// Load configuration from an explicit file, then apply env overrides.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let partial: PartialConfig = toml::from_str(&content).map_err(|e| {
            Error::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        let mut config = Self::default();
        config.apply_partial(partial);
        config.apply_env_overrides();
        Ok(config)
    }

    /// Get the config directory.
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("anymailfinder"))
            .unwrap_or_else(|| PathBuf::from(".anymailfinder"))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("AMF_BASE_URL") {
            self.api.base_url = url;
        }
        if let Ok(timeout) = std::env::var("AMF_TIMEOUT_SECONDS") {
            if let Ok(parsed) = timeout.parse::<u64>() {
                self.api.timeout_seconds = parsed;
            }
        }
        if let Ok(timeout) = std::env::var("AMF_CONNECT_TIMEOUT_SECONDS") {
            if let Ok(parsed) = timeout.parse::<u64>() {
                self.api.connect_timeout_seconds = parsed;
            }
        }
        if let Ok(scheme) = std::env::var("AMF_AUTH_SCHEME") {
            match scheme.parse::<AuthScheme>() {
                Ok(parsed) => self.api.auth_scheme = parsed,
                Err(e) => tracing::warn!("Ignoring AMF_AUTH_SCHEME: {}", e),
            }
        }
        if let Ok(flag) = std::env::var("AMF_CONTINUE_ON_FAIL") {
            self.execution.continue_on_fail = flag.to_lowercase() == "true";
        }
        if let Ok(limit) = std::env::var("AMF_MAX_CONCURRENCY") {
            if let Ok(parsed) = limit.parse::<usize>() {
                self.execution.max_concurrency = parsed.max(1);
            }
        }
    }

    fn load_partial_from_path(path: &Path) -> std::result::Result<PartialConfig, ()> {
        let content = std::fs::read_to_string(path).map_err(|_| ())?;
        toml::from_str(&content).map_err(|_| ())
    }

    fn apply_partial(&mut self, partial: PartialConfig) {
        if let Some(api) = partial.api {
            self.api = api;
        }
        if let Some(execution) = partial.execution {
            self.execution = execution;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct PartialConfig {
    api: Option<ApiConfig>,
    execution: Option<ExecutionConfig>,
}
