//! Client configuration

use crate::HttpClient;

/// Default admin API address
pub const DEFAULT_ADMIN_URL: &str = "http://localhost:8000";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the admin API connection
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Admin API base URL, e.g. `http://localhost:8000`
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ClientConfig {
    /// Create a new configuration with the default timeout
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set the request timeout in seconds
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Build an HTTP client from this configuration
    pub fn build_client(&self) -> HttpClient {
        HttpClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ADMIN_URL)
    }
}
