//! Entity snapshots published to the host platform

use serde::Serialize;
use serde_json::{Map, Value};

use crate::value_objects::SensorState;

/// Icon of the per-stop summary entity
pub const STOP_ICON: &str = "mdi:bus-clock";

/// Icon of the per-departure entities
pub const DEPARTURE_ICON: &str = "mdi:bus";

/// Device classification of every entity
pub const DEVICE_CLASS_TIMESTAMP: &str = "timestamp";

/// Data source attribution
pub const ATTRIBUTION: &str = "Data provided by https://atbapi.tar.io/";

/// Point-in-time view of one entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySnapshot {
    /// Host entity id, e.g. `sensor.atb_stop_0`
    pub entity_id: String,
    /// Display name
    pub name: Option<String>,
    /// Icon identifier
    pub icon: &'static str,
    /// Device classification
    pub device_class: &'static str,
    /// Current state
    pub state: SensorState,
    /// Diagnostic attributes
    pub attributes: Map<String, Value>,
    /// Whether the host should poll this entity on its own
    pub should_poll: bool,
    /// Data source attribution
    pub attribution: &'static str,
}

/// Entity id of the summary entity for a configured device
#[must_use]
pub fn stop_entity_id(device: &str) -> String {
    format!("sensor.{}", slugify(device))
}

/// Entity id of departure slot `index` for a configured device
#[must_use]
pub fn slot_entity_id(device: &str, index: usize) -> String {
    format!("sensor.{}_{index}", slugify(device))
}

fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    for c in input.trim().chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }
    let slug = slug.trim_matches('_');
    if slug.is_empty() {
        "unnamed".to_string()
    } else {
        slug.to_string()
    }
}
