//! AtB departure client
//!
//! Fetches the departure board of a single stop from
//! `{base_url}/{stop_id}/`.

use std::time::Duration;

use async_trait::async_trait;
use domain::{DeparturesPayload, StopId};
use reqwest::Client;
use tracing::{debug, instrument, warn};

use crate::config::AtbConfig;
use crate::error::AtbError;

/// Trait for departure service clients
#[async_trait]
pub trait DepartureClient: Send + Sync {
    /// Fetch the departure list for a stop
    async fn fetch_departures(&self, stop_id: &StopId) -> Result<DeparturesPayload, AtbError>;

    /// Check if the departure service is reachable
    async fn is_healthy(&self) -> bool;
}

/// HTTP client for the AtB departure API
#[derive(Debug)]
pub struct AtbDepartureClient {
    client: Client,
    config: AtbConfig,
}

impl AtbDepartureClient {
    /// Create a new departure client
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &AtbConfig) -> Result<Self, AtbError> {
        config.validate().map_err(AtbError::ConfigurationError)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| AtbError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &AtbConfig {
        &self.config
    }

    /// Parse a raw departure body
    fn parse_departures_response(body: &str) -> Result<DeparturesPayload, AtbError> {
        serde_json::from_str(body).map_err(|e| AtbError::ParseError(e.to_string()))
    }

    fn map_send_error(&self, e: &reqwest::Error) -> AtbError {
        if e.is_timeout() {
            AtbError::Timeout {
                timeout_secs: self.config.timeout_secs,
            }
        } else {
            AtbError::ConnectionFailed(e.to_string())
        }
    }
}

#[async_trait]
impl DepartureClient for AtbDepartureClient {
    #[instrument(skip(self), fields(stop_id = %stop_id))]
    async fn fetch_departures(&self, stop_id: &StopId) -> Result<DeparturesPayload, AtbError> {
        let url = self.config.departures_url(stop_id.as_str());

        debug!(?url, "Fetching departures");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_send_error(&e))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AtbError::RateLimitExceeded {
                retry_after_secs: response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok()),
            });
        }

        if !status.is_success() {
            return Err(AtbError::RequestFailed(format!("HTTP {status}")));
        }

        let body = response.text().await.map_err(|e| self.map_send_error(&e))?;

        let payload = Self::parse_departures_response(&body)?;

        if payload.departures.is_empty() {
            warn!("No departures returned");
        }

        debug!(count = payload.departures.len(), "Departures fetched");
        Ok(payload)
    }

    async fn is_healthy(&self) -> bool {
        self.client.get(&self.config.base_url).send().await.is_ok()
    }
}
