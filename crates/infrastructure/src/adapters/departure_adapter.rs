//! Departure adapter - Implements DeparturePort using integration_atb

use application::error::ApplicationError;
use application::ports::DeparturePort;
use async_trait::async_trait;
use domain::{DeparturesPayload, StopId};
use integration_atb::{AtbConfig, AtbDepartureClient, AtbError, DepartureClient};
use tracing::{debug, instrument, warn};

/// Adapter for the AtB departure API
#[derive(Debug)]
pub struct AtbDepartureAdapter<C = AtbDepartureClient> {
    client: C,
}

impl AtbDepartureAdapter {
    /// Create an adapter with an HTTP client built from `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// fails to initialize.
    pub fn from_config(config: &AtbConfig) -> Result<Self, ApplicationError> {
        let client = AtbDepartureClient::new(config).map_err(map_atb_error)?;
        Ok(Self::new(client))
    }
}

impl<C: DepartureClient> AtbDepartureAdapter<C> {
    /// Wrap an existing departure client
    pub const fn new(client: C) -> Self {
        Self { client }
    }
}

/// Map client errors onto the port's error kinds
fn map_atb_error(e: AtbError) -> ApplicationError {
    match e {
        AtbError::ParseError(msg) => ApplicationError::MalformedResponse(msg),
        AtbError::ConfigurationError(msg) => ApplicationError::Configuration(msg),
        other => ApplicationError::NetworkFailure(other.to_string()),
    }
}

#[async_trait]
impl<C: DepartureClient> DeparturePort for AtbDepartureAdapter<C> {
    #[instrument(skip(self), fields(stop_id = %stop_id))]
    async fn fetch_departures(
        &self,
        stop_id: &StopId,
    ) -> Result<DeparturesPayload, ApplicationError> {
        match self.client.fetch_departures(stop_id).await {
            Ok(payload) => {
                debug!(count = payload.departures.len(), "Fetched departures");
                Ok(payload)
            },
            Err(e) => {
                warn!(error = %e, "Departure fetch failed");
                Err(map_atb_error(e))
            },
        }
    }

    async fn is_available(&self) -> bool {
        self.client.is_healthy().await
    }
}
