//! Departure data port
//!
//! Defines how the stop monitor obtains the raw departure list for a stop.
//! Adapters in the infrastructure layer implement this port over HTTP.

use async_trait::async_trait;
use domain::{DeparturesPayload, StopId};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for fetching upcoming departures
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DeparturePort: Send + Sync {
    /// Fetch the current departure list for a stop
    ///
    /// Transport problems surface as [`ApplicationError::NetworkFailure`],
    /// unusable bodies as [`ApplicationError::MalformedResponse`].
    async fn fetch_departures(
        &self,
        stop_id: &StopId,
    ) -> Result<DeparturesPayload, ApplicationError>;

    /// Check if the departure service is reachable
    async fn is_available(&self) -> bool;
}
