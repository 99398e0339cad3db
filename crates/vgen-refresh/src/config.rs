//! Refresh configuration.

use std::time::Duration;

use crate::error::{RefreshError, RefreshResult};

/// Default validity of reissued links (7 days).
pub const DEFAULT_SIGNED_URL_EXPIRY_SECS: u64 = 604_800;

/// Maximum allowed validity (7 days) to prevent long-lived URL leakage.
pub const MAX_SIGNED_URL_EXPIRY_SECS: u64 = 604_800;

/// Refresh configuration.
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Storage endpoint; only links containing it are considered for refresh.
    pub endpoint_prefix: String,
    /// Validity window requested for every reissued link.
    pub validity: Duration,
    /// Cap on in-flight reissue requests. `None` means unbounded.
    pub max_concurrency: Option<usize>,
}

impl RefreshConfig {
    /// Create a config with the default 7 day validity and no concurrency cap.
    pub fn new(endpoint_prefix: impl Into<String>) -> Self {
        Self {
            endpoint_prefix: endpoint_prefix.into().trim_end_matches('/').to_string(),
            validity: Duration::from_secs(DEFAULT_SIGNED_URL_EXPIRY_SECS),
            max_concurrency: None,
        }
    }

    /// Override the validity window, clamped to `1..=MAX_SIGNED_URL_EXPIRY_SECS` seconds.
    pub fn with_validity(mut self, validity: Duration) -> Self {
        self.validity = clamp_validity(validity.as_secs());
        self
    }

    /// Bound the number of concurrent reissue requests. Zero disables the bound.
    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = (max > 0).then_some(max);
        self
    }

    /// Create config from environment variables.
    pub fn from_env() -> RefreshResult<Self> {
        let endpoint_prefix = std::env::var("STORAGE_URL")
            .map_err(|_| RefreshError::config("STORAGE_URL not set"))?;
        if endpoint_prefix.trim().is_empty() {
            return Err(RefreshError::config("STORAGE_URL cannot be empty"));
        }

        let expiry_secs = std::env::var("SIGNED_URL_EXPIRY_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_SIGNED_URL_EXPIRY_SECS);

        let max_concurrency = std::env::var("REFRESH_MAX_CONCURRENCY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);

        Ok(Self::new(endpoint_prefix.trim())
            .with_validity(Duration::from_secs(expiry_secs))
            .with_max_concurrency(max_concurrency))
    }
}

fn clamp_validity(secs: u64) -> Duration {
    Duration::from_secs(secs.clamp(1, MAX_SIGNED_URL_EXPIRY_SECS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in ["STORAGE_URL", "SIGNED_URL_EXPIRY_SECS", "REFRESH_MAX_CONCURRENCY"] {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_defaults() {
        let config = RefreshConfig::new("https://x.test/");
        assert_eq!(config.endpoint_prefix, "https://x.test");
        assert_eq!(config.validity, Duration::from_secs(7 * 24 * 60 * 60));
        assert!(config.max_concurrency.is_none());
    }

    #[test]
    fn test_validity_is_clamped() {
        let config = RefreshConfig::new("https://x.test").with_validity(Duration::from_secs(0));
        assert_eq!(config.validity, Duration::from_secs(1));

        let config =
            RefreshConfig::new("https://x.test").with_validity(Duration::from_secs(30 * 86_400));
        assert_eq!(config.validity, Duration::from_secs(MAX_SIGNED_URL_EXPIRY_SECS));

        let config = RefreshConfig::new("https://x.test").with_validity(Duration::from_secs(3600));
        assert_eq!(config.validity, Duration::from_secs(3600));
    }

    #[test]
    fn test_zero_concurrency_means_unbounded() {
        let config = RefreshConfig::new("https://x.test").with_max_concurrency(0);
        assert!(config.max_concurrency.is_none());

        let config = RefreshConfig::new("https://x.test").with_max_concurrency(8);
        assert_eq!(config.max_concurrency, Some(8));
    }

    #[test]
    #[serial]
    fn test_from_env() {
        clear_env();
        std::env::set_var("STORAGE_URL", "https://x.test/");
        std::env::set_var("SIGNED_URL_EXPIRY_SECS", "86400");
        std::env::set_var("REFRESH_MAX_CONCURRENCY", "16");

        let config = RefreshConfig::from_env().unwrap();
        assert_eq!(config.endpoint_prefix, "https://x.test");
        assert_eq!(config.validity, Duration::from_secs(86_400));
        assert_eq!(config.max_concurrency, Some(16));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_requires_storage_url() {
        clear_env();
        assert!(matches!(RefreshConfig::from_env(), Err(RefreshError::Config(_))));

        std::env::set_var("STORAGE_URL", "   ");
        assert!(RefreshConfig::from_env().is_err());
        clear_env();
    }
}
