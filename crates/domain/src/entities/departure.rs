//! Departure records as returned by the departure API
//!
//! Only `line` and `registeredDepartureTime` are interpreted. Every other
//! field is kept verbatim so it can be exposed as a diagnostic attribute.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::value_objects::LineId;

/// One upcoming departure at a stop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartureRecord {
    /// Line identifier
    pub line: LineId,
    /// Naive local departure time (ISO-8601, no offset)
    pub registered_departure_time: String,
    /// Remaining fields, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DepartureRecord {
    /// Create a record with no extra fields
    pub fn new(line: impl Into<LineId>, registered_departure_time: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            registered_departure_time: registered_departure_time.into(),
            extra: Map::new(),
        }
    }

    /// The record as a JSON object, extra fields included
    #[must_use]
    pub fn to_attributes(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

/// Full response body for one stop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeparturesPayload {
    /// Departures in the order the API returned them
    pub departures: Vec<DepartureRecord>,
    /// Remaining top-level fields, e.g. `isGoingTowardsCentrum`
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DeparturesPayload {
    /// Create a payload with no extra top-level fields
    #[must_use]
    pub fn new(departures: Vec<DepartureRecord>) -> Self {
        Self {
            departures,
            extra: Map::new(),
        }
    }

    /// The payload as a JSON object, extra fields included
    #[must_use]
    pub fn to_attributes(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}
