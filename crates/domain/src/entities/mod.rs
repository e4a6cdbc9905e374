//! Domain entities - Departure data and the entity view exposed to the host

mod departure;
mod entity_snapshot;

pub use departure::{DepartureRecord, DeparturesPayload};
pub use entity_snapshot::{
    ATTRIBUTION, DEVICE_CLASS_TIMESTAMP, DEPARTURE_ICON, EntitySnapshot, STOP_ICON,
    slot_entity_id, stop_entity_id,
};
