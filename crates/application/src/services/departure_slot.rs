//! Departure slot - passive projection of one upcoming departure
//!
//! A slot never fetches anything. Its owning [`StopMonitor`](super::StopMonitor)
//! hands it a record after each successful poll, and the slot publishes its
//! own snapshot right after the update.

use chrono::{DateTime, FixedOffset};
use domain::{
    ATTRIBUTION, DEPARTURE_ICON, DEVICE_CLASS_TIMESTAMP, DepartureRecord, EntitySnapshot, LineId,
    SensorState, Timezone,
};
use serde_json::Map;
use tracing::trace;

use crate::error::ApplicationError;
use crate::ports::PublishCallback;
use crate::timestamp_parser::parse_local_timestamp;

/// One of the per-departure entities owned by a stop monitor
pub struct DepartureSlot {
    entity_id: String,
    label: Option<LineId>,
    state: SensorState,
    record: Option<DepartureRecord>,
    publish: PublishCallback,
}

impl std::fmt::Debug for DepartureSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DepartureSlot")
            .field("entity_id", &self.entity_id)
            .field("label", &self.label)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl DepartureSlot {
    /// Create an empty slot in the `unknown` state
    pub fn new(entity_id: impl Into<String>, publish: PublishCallback) -> Self {
        Self {
            entity_id: entity_id.into(),
            label: None,
            state: SensorState::Unknown,
            record: None,
            publish,
        }
    }

    /// Project a departure record onto this slot
    ///
    /// On success the label, state, and stored record all come from `record`
    /// and the new snapshot is published. A parse failure leaves the slot as
    /// it was.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::TimestampParseFailure`] if the departure
    /// time is not a valid local timestamp.
    pub fn apply(
        &mut self,
        record: DepartureRecord,
        timezone: Timezone,
    ) -> Result<(), ApplicationError> {
        let departs_at = parse_local_timestamp(&record.registered_departure_time, timezone)?;
        self.commit(record, departs_at);
        Ok(())
    }

    /// Store an already-parsed record and publish
    pub(crate) fn commit(&mut self, record: DepartureRecord, departs_at: DateTime<FixedOffset>) {
        self.label = Some(record.line.clone());
        self.state = SensorState::Timestamp(departs_at);
        self.record = Some(record);

        trace!(entity_id = %self.entity_id, state = %self.state, "Departure slot updated");
        (self.publish)(&self.snapshot());
    }

    /// Host entity id
    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    /// Line of the last applied record
    pub const fn label(&self) -> Option<&LineId> {
        self.label.as_ref()
    }

    /// Current state
    pub const fn state(&self) -> SensorState {
        self.state
    }

    /// Last applied record
    pub const fn record(&self) -> Option<&DepartureRecord> {
        self.record.as_ref()
    }

    /// Current snapshot; slots are never polled by the host
    pub fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot {
            entity_id: self.entity_id.clone(),
            name: self.label.as_ref().map(LineId::label),
            icon: DEPARTURE_ICON,
            device_class: DEVICE_CLASS_TIMESTAMP,
            state: self.state,
            attributes: self
                .record
                .as_ref()
                .map_or_else(Map::new, DepartureRecord::to_attributes),
            should_poll: false,
            attribution: ATTRIBUTION,
        }
    }
}
