//! Departure API client configuration

use serde::{Deserialize, Serialize};

/// Upper bound for the request timeout; polls run once a minute
const MAX_TIMEOUT_SECS: u64 = 60;

/// Configuration for the AtB departure API client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtbConfig {
    /// Base URL; the stop id and a trailing slash are appended per request
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "https://atbapi.tar.io/api/v1/departures".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("busboard/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for AtbConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl AtbConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: 2,
            ..Default::default()
        }
    }

    /// URL of the departure list for a stop
    #[must_use]
    pub fn departures_url(&self, stop_id: &str) -> String {
        format!("{}/{stop_id}/", self.base_url.trim_end_matches('/'))
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(format!("base_url must be an http(s) URL: {}", self.base_url));
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(format!("timeout_secs must be {MAX_TIMEOUT_SECS} or less"));
        }

        Ok(())
    }
}
