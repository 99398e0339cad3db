//! Storage client configuration.

use std::time::Duration;

use crate::error::{StorageError, StorageResult};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Configuration for the storage REST client.
#[derive(Clone)]
pub struct StorageConfig {
    /// Project endpoint (e.g. https://abc.example.co), without trailing slash.
    /// Also the prefix used to recognise links that belong to this storage.
    pub endpoint_url: String,
    /// Service key sent as bearer token and `apikey` header
    pub api_key: String,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("endpoint_url", &self.endpoint_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

impl StorageConfig {
    /// Create a config with default timeouts.
    pub fn new(endpoint_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    /// Create config from environment variables.
    pub fn from_env() -> StorageResult<Self> {
        let endpoint_url = std::env::var("STORAGE_URL")
            .map_err(|_| StorageError::config_error("STORAGE_URL not set"))?;
        if endpoint_url.trim().is_empty() {
            return Err(StorageError::config_error("STORAGE_URL cannot be empty"));
        }

        let api_key = std::env::var("STORAGE_SERVICE_KEY")
            .map_err(|_| StorageError::config_error("STORAGE_SERVICE_KEY not set"))?;
        if api_key.is_empty() {
            return Err(StorageError::config_error("STORAGE_SERVICE_KEY cannot be empty"));
        }

        let mut config = Self::new(endpoint_url.trim(), api_key);
        config.timeout = Duration::from_secs(
            std::env::var("STORAGE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        );
        config.connect_timeout = Duration::from_secs(
            std::env::var("STORAGE_CONNECT_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
        );

        Ok(config)
    }
}
