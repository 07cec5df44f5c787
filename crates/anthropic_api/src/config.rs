use std::collections::BTreeMap;
use std::time::Duration;

use crate::url::DEFAULT_BASE_URL;

/// Value sent in the `anthropic-version` header.
pub const DEFAULT_API_VERSION: &str = "2023-06-01";

/// Transport configuration for Messages API requests.
#[derive(Debug, Clone)]
pub struct AnthropicApiConfig {
    /// Sent as `x-api-key`.
    pub api_key: String,
    /// Base URL; normalized to the `/v1/messages` endpoint.
    pub base_url: String,
    /// Sent as `anthropic-version`.
    pub version: String,
    /// Additional headers merged into request headers.
    pub extra_headers: BTreeMap<String, String>,
    /// Optional request timeout.
    pub timeout: Option<Duration>,
}

impl Default for AnthropicApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            version: DEFAULT_API_VERSION.to_string(),
            extra_headers: BTreeMap::new(),
            timeout: None,
        }
    }
}

impl AnthropicApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn insert_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(key.into(), value.into());
        self
    }
}
