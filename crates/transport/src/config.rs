//! Connection settings for [`crate::HttpStoreClient`].

use std::time::Duration;

use extensions::StoreConfig;
use serde::{Deserialize, Serialize};

/// Default connect timeout, in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Settings for the HTTP base client.
///
/// Deserialisable so it can be embedded in an application's own config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Store API base URL, e.g. `https://api.example.com`. A path prefix is
    /// allowed (`https://example.com/commerce`).
    pub base_url: String,

    /// Publishable API key sent as `x-publishable-api-key` on every request.
    #[serde(default)]
    pub publishable_key: Option<String>,

    /// Overall request timeout in seconds. `None` leaves requests unbounded.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// TCP/TLS connect timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// `User-Agent` header value.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    concat!("storefront-extensions/", env!("CARGO_PKG_VERSION")).to_owned()
}

impl TransportConfig {
    /// Settings for `base_url` with every other field at its default.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            publishable_key: None,
            timeout_secs: None,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            user_agent: default_user_agent(),
        }
    }

    /// Sets the publishable API key.
    #[must_use]
    pub fn with_publishable_key(mut self, key: impl Into<String>) -> Self {
        self.publishable_key = Some(key.into());
        self
    }

    /// Sets the overall request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = Some(timeout.as_secs());
        self
    }

    /// The out-of-band settings plugins need when they bypass the base client.
    pub fn store_config(&self) -> StoreConfig {
        let config = StoreConfig::new().with_base_url(self.base_url.clone());
        match &self.publishable_key {
            Some(key) => config.with_publishable_key(key.clone()),
            None => config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: TransportConfig =
            serde_json::from_str(r#"{ "base_url": "http://localhost:9000" }"#).unwrap();

        assert_eq!(config.publishable_key, None);
        assert_eq!(config.timeout_secs, None);
        assert_eq!(config.connect_timeout_secs, DEFAULT_CONNECT_TIMEOUT_SECS);
        assert!(config.user_agent.starts_with("storefront-extensions/"));
    }

    #[test]
    fn test_store_config_mirrors_connection_settings() {
        let store = TransportConfig::new("http://localhost:9000")
            .with_publishable_key("pk_test")
            .store_config();

        assert_eq!(store.base_url(), Some("http://localhost:9000"));
        assert_eq!(store.publishable_key(), Some("pk_test"));
    }
}
