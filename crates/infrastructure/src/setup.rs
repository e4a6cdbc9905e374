//! Wiring of configured sensors into stop monitors

use std::sync::Arc;

use application::ports::{DeparturePort, PublishCallback};
use application::StopMonitor;
use tracing::info;

use crate::config::AppConfig;

/// Create one stop monitor per configured sensor, ordered by device key
///
/// Every monitor shares the same departure port and publish callback.
pub fn build_monitors(
    config: &AppConfig,
    port: &Arc<dyn DeparturePort>,
    publish: &PublishCallback,
) -> Vec<StopMonitor> {
    config
        .sensors
        .iter()
        .map(|(device, sensor)| {
            let monitor = StopMonitor::new(
                sensor.to_monitor_config(device),
                Arc::clone(port),
                config.timezone,
                Arc::clone(publish),
            );
            info!(
                entity_id = %monitor.entity_id(),
                stop_id = %sensor.stop_id,
                slots = monitor.slots().len(),
                "Stop monitor created"
            );
            monitor
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use application::noop_publisher;
    use domain::StopId;

    use super::*;
    use crate::config::SensorConfig;
    use crate::testing::MockDepartureApi;

    fn sensor(stop_id: &str, all_departures: bool) -> SensorConfig {
        SensorConfig {
            stop_id: StopId::new(stop_id).unwrap(),
            stop_name: None,
            bus_filter: None,
            all_departures,
        }
    }

    #[test]
    fn test_build_monitors() {
        let mut config = AppConfig::default();
        config.sensors.insert("prinsens_gate".to_string(), sensor("16010480", true));
        config.sensors.insert("lerkendal".to_string(), sensor("16010265", false));

        let port: Arc<dyn DeparturePort> = Arc::new(MockDepartureApi::new());
        let monitors = build_monitors(&config, &port, &noop_publisher());

        assert_eq!(monitors.len(), 2);
        assert_eq!(monitors[0].entity_id(), "sensor.lerkendal");
        assert!(monitors[0].slots().is_empty());
        assert_eq!(monitors[1].entity_id(), "sensor.prinsens_gate");
        assert_eq!(monitors[1].slots().len(), 5);
        assert_eq!(monitors[1].slots()[4].entity_id(), "sensor.prinsens_gate_4");
    }

    #[test]
    fn test_build_monitors_without_sensors() {
        let port: Arc<dyn DeparturePort> = Arc::new(MockDepartureApi::new());
        assert!(build_monitors(&AppConfig::default(), &port, &noop_publisher()).is_empty());
    }
}
