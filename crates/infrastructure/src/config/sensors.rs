//! Per-stop sensor configuration

use application::StopMonitorConfig;
use domain::{LineFilter, StopId};
use serde::{Deserialize, Serialize};

/// One monitored stop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Operator stop code (string or integer)
    pub stop_id: StopId,

    /// Display name of the summary entity
    #[serde(default)]
    pub stop_name: Option<String>,

    /// Lines counted towards the summary state (list or comma-separated)
    #[serde(default)]
    pub bus_filter: Option<LineFilter>,

    /// Create the five per-departure entities
    #[serde(default)]
    pub all_departures: bool,
}

impl SensorConfig {
    /// Monitor settings for this sensor under the given device key
    #[must_use]
    pub fn to_monitor_config(&self, device: &str) -> StopMonitorConfig {
        StopMonitorConfig {
            device: device.to_string(),
            stop_id: self.stop_id.clone(),
            name: self.stop_name.clone(),
            line_filter: self.bus_filter.clone(),
            expose_departures: self.all_departures,
        }
    }
}
