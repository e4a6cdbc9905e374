//! Testing utilities for infrastructure unit tests.
//!
//! Provides a mockall double of the departure port and small fixtures for
//! building monitors and payloads.

use std::sync::Arc;

use application::ports::{DeparturePort, PublishCallback};
use application::{ApplicationError, StopMonitor, StopMonitorConfig};
use async_trait::async_trait;
use domain::{DepartureRecord, DeparturesPayload, StopId, Timezone};

mockall::mock! {
    /// Departure port double
    pub DepartureApi {}

    #[async_trait]
    impl DeparturePort for DepartureApi {
        async fn fetch_departures(
            &self,
            stop_id: &StopId,
        ) -> Result<DeparturesPayload, ApplicationError>;
        async fn is_available(&self) -> bool;
    }
}

/// Payload with one record per `(line, time)` pair
pub fn payload(records: &[(&str, &str)]) -> DeparturesPayload {
    DeparturesPayload::new(
        records
            .iter()
            .map(|(line, time)| DepartureRecord::new(*line, *time))
            .collect(),
    )
}

/// Monitor for `device` at stop 16010480 without slots
pub fn monitor(device: &str, port: MockDepartureApi, publish: PublishCallback) -> StopMonitor {
    StopMonitor::new(
        StopMonitorConfig::new(device, StopId::new("16010480").unwrap()),
        Arc::new(port),
        Timezone::oslo(),
        publish,
    )
}
