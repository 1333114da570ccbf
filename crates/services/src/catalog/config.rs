use std::env;

use url::Url;
use url::form_urlencoded::byte_serialize;

use super::retry::RetryPolicy;
use crate::error::CatalogError;

const DEFAULT_BASE_URL: &str = "https://api.musixmatch.com/ws/1.1";
const DEFAULT_RELAY_PREFIX: &str = "https://corsproxy.io/?";

/// Connection settings for the remote catalog.
#[derive(Clone, Debug)]
pub struct CatalogConfig {
    pub base_url: String,
    pub api_key: String,
    /// Optional CORS-relay prefix the target URL is wrapped in. Purely a
    /// transport indirection; response semantics are unchanged.
    pub relay_prefix: Option<String>,
    pub retry: RetryPolicy,
}

impl CatalogConfig {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            relay_prefix: Some(DEFAULT_RELAY_PREFIX.into()),
            retry: RetryPolicy::default(),
        }
    }

    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("WHOSINGS_MXM_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let mut config = Self::new(api_key);
        if let Ok(base_url) = env::var("WHOSINGS_MXM_BASE_URL") {
            config.base_url = base_url;
        }
        match env::var("WHOSINGS_RELAY_PREFIX") {
            Ok(prefix) if prefix.is_empty() => config.relay_prefix = None,
            Ok(prefix) => config.relay_prefix = Some(prefix),
            Err(_) => {}
        }
        Some(config)
    }

    #[must_use]
    pub fn without_relay(mut self) -> Self {
        self.relay_prefix = None;
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Final request URL for an API endpoint, routed through the relay
    /// when one is configured.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Url` if the resulting string is not a valid URL.
    pub fn request_url(&self, endpoint: &str) -> Result<Url, CatalogError> {
        let raw = match &self.relay_prefix {
            Some(prefix) => {
                let encoded: String = byte_serialize(endpoint.as_bytes()).collect();
                format!("{prefix}{encoded}")
            }
            None => endpoint.to_owned(),
        };
        Ok(Url::parse(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_wraps_and_encodes_the_endpoint() {
        let config = CatalogConfig::new("key");
        let url = config
            .request_url("https://api.musixmatch.com/ws/1.1/chart.tracks.get?apikey=key&page=1")
            .unwrap();

        let raw = url.as_str();
        assert!(raw.starts_with("https://corsproxy.io/?"));
        // The target URL must be percent-encoded behind the relay prefix.
        assert!(raw.contains("https%3A%2F%2Fapi.musixmatch.com"));
        assert!(!raw[DEFAULT_RELAY_PREFIX.len()..].contains("?apikey"));
    }

    #[test]
    fn without_relay_uses_endpoint_directly() {
        let config = CatalogConfig::new("key").without_relay();
        let endpoint = "https://api.musixmatch.com/ws/1.1/chart.tracks.get?apikey=key";
        let url = config.request_url(endpoint).unwrap();
        assert_eq!(url.as_str(), endpoint);
    }
}
