//! Application configuration
//!
//! Loaded from an optional TOML file and `BUSBOARD_`-prefixed environment
//! variables (nested keys separated by `__`, e.g. `BUSBOARD_ATB__TIMEOUT_SECS`).
//!
//! ```toml
//! timezone = "Europe/Oslo"
//! schedule = "0 * * * * *"
//!
//! [sensors.atb_stop]
//! stop_id = 16010480
//! stop_name = "Prinsens gate"
//! bus_filter = "3, 9"
//! all_departures = true
//! ```

mod sensors;

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use domain::{Timezone, slot_entity_id, stop_entity_id};
use integration_atb::AtbConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::scheduler::{EVERY_MINUTE, validate_cron};
use crate::telemetry::LoggingConfig;

pub use sensors::SensorConfig;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "BUSBOARD";

/// Config file looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_NAME: &str = "busboard";

fn default_schedule() -> String {
    EVERY_MINUTE.to_string()
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Zone the departure API reports its naive local times in
    #[serde(default)]
    pub timezone: Timezone,

    /// Poll schedule as a 6-field cron expression
    #[serde(default = "default_schedule")]
    pub schedule: String,

    /// Departure API client settings
    #[serde(default)]
    pub atb: AtbConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Monitored stops keyed by device name
    #[serde(default)]
    pub sensors: BTreeMap<String, SensorConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            timezone: Timezone::default(),
            schedule: default_schedule(),
            atb: AtbConfig::default(),
            logging: LoggingConfig::default(),
            sensors: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from an optional file and the environment
    ///
    /// With `path` the file must exist; without it `busboard.toml` in the
    /// working directory is used if present.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = path.map_or_else(
            || config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
            |p| config::File::from(p).required(true),
        );

        let builder = config::Config::builder()
            .set_default("timezone", Timezone::oslo().name())?
            .set_default("schedule", EVERY_MINUTE)?
            .add_source(file)
            // Override with environment variables (e.g., BUSBOARD_ATB__TIMEOUT_SECS)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        debug!(sensors = config.sensors.len(), "Configuration loaded");
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns every problem found, one per entry.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Err(e) = validate_cron(&self.schedule) {
            errors.push(e.to_string());
        }
        if let Err(e) = self.atb.validate() {
            errors.push(format!("atb: {e}"));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(format!("logging: {e}"));
        }
        if self.sensors.is_empty() {
            errors.push("at least one sensor must be configured".to_string());
        }

        let mut entity_ids = HashSet::new();
        for (device, sensor) in &self.sensors {
            let mut ids = vec![stop_entity_id(device)];
            if sensor.all_departures {
                ids.extend((0..application::DEPARTURE_SLOT_COUNT).map(|i| slot_entity_id(device, i)));
            }
            for id in ids {
                if !entity_ids.insert(id.clone()) {
                    errors.push(format!("sensor '{device}': entity id {id} is already in use"));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
