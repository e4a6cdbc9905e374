//! Stop monitor - polls one stop and projects its departures
//!
//! Each poll fetches the stop's departure list, derives the summary state
//! (the next departure allowed by the line filter), and fans the first
//! departures out to the monitor's slots in the order the API returned them.
//!
//! A poll cycle is all-or-nothing: every timestamp that will be written is
//! parsed before any state changes, so a failed cycle leaves the monitor and
//! its slots exactly as they were.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use domain::{
    ATTRIBUTION, DepartureRecord, DeparturesPayload, DEVICE_CLASS_TIMESTAMP, EntitySnapshot,
    LineFilter, STOP_ICON, SensorState, StopId, Timezone, slot_entity_id, stop_entity_id,
};
use serde_json::Map;
use tracing::{debug, instrument};

use super::DepartureSlot;
use crate::error::ApplicationError;
use crate::ports::{DeparturePort, PublishCallback};
use crate::timestamp_parser::parse_local_timestamp;

/// Number of per-departure slots created when they are enabled
pub const DEPARTURE_SLOT_COUNT: usize = 5;

/// Static settings of one monitored stop
#[derive(Debug, Clone)]
pub struct StopMonitorConfig {
    /// Configuration key, used to derive entity ids
    pub device: String,
    /// Stop to poll
    pub stop_id: StopId,
    /// Display name of the summary entity
    pub name: Option<String>,
    /// Lines counted towards the summary state; `None` counts every line
    pub line_filter: Option<LineFilter>,
    /// Whether to create the per-departure slots
    pub expose_departures: bool,
}

impl StopMonitorConfig {
    /// Create a config with no name, no filter, and no slots
    pub fn new(device: impl Into<String>, stop_id: StopId) -> Self {
        Self {
            device: device.into(),
            stop_id,
            name: None,
            line_filter: None,
            expose_departures: false,
        }
    }

    /// Set the display name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the line filter
    #[must_use]
    pub fn with_line_filter(mut self, filter: LineFilter) -> Self {
        self.line_filter = Some(filter);
        self
    }

    /// Enable or disable the per-departure slots
    #[must_use]
    pub const fn with_departures(mut self, enabled: bool) -> Self {
        self.expose_departures = enabled;
        self
    }
}

/// Summary of a successful poll cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOutcome {
    /// Number of departures in the response
    pub departures: usize,
    /// Whether a departure passed the line filter
    pub summary_matched: bool,
    /// Number of slots that received a record
    pub slots_updated: usize,
}

/// Derived state of one cycle, computed before anything is mutated
struct PreparedCycle {
    summary: SensorState,
    slot_times: Vec<DateTime<FixedOffset>>,
}

/// First departure whose line passes `filter`; every departure passes `None`
pub fn select_next_departure<'a>(
    departures: &'a [DepartureRecord],
    filter: Option<&LineFilter>,
) -> Option<&'a DepartureRecord> {
    departures
        .iter()
        .find(|departure| filter.is_none_or(|f| f.matches(&departure.line)))
}

/// Polls one stop and owns its departure slots
pub struct StopMonitor {
    entity_id: String,
    stop_id: StopId,
    name: Option<String>,
    line_filter: Option<LineFilter>,
    timezone: Timezone,
    port: Arc<dyn DeparturePort>,
    publish: PublishCallback,
    state: SensorState,
    payload: Option<DeparturesPayload>,
    slots: Box<[DepartureSlot]>,
}

impl std::fmt::Debug for StopMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StopMonitor")
            .field("entity_id", &self.entity_id)
            .field("stop_id", &self.stop_id)
            .field("line_filter", &self.line_filter)
            .field("timezone", &self.timezone)
            .field("state", &self.state)
            .field("slots", &self.slots)
            .finish_non_exhaustive()
    }
}

impl StopMonitor {
    /// Create a monitor and, if enabled, its slots
    ///
    /// An empty line filter is treated as no filter.
    pub fn new(
        config: StopMonitorConfig,
        port: Arc<dyn DeparturePort>,
        timezone: Timezone,
        publish: PublishCallback,
    ) -> Self {
        let slots: Box<[DepartureSlot]> = if config.expose_departures {
            (0..DEPARTURE_SLOT_COUNT)
                .map(|i| DepartureSlot::new(slot_entity_id(&config.device, i), Arc::clone(&publish)))
                .collect()
        } else {
            Box::default()
        };

        Self {
            entity_id: stop_entity_id(&config.device),
            stop_id: config.stop_id,
            name: config.name,
            line_filter: config.line_filter.filter(|f| !f.is_empty()),
            timezone,
            port,
            publish,
            state: SensorState::Unknown,
            payload: None,
            slots,
        }
    }

    /// Run one poll cycle
    ///
    /// On success the summary state, the stored payload, and the first
    /// `min(departures, slots)` slots are updated, slots publish themselves,
    /// and then the monitor publishes its own snapshot. Slots beyond the
    /// number of returned departures keep their previous values.
    ///
    /// # Errors
    ///
    /// Returns the port's error if the fetch fails, or
    /// [`ApplicationError::TimestampParseFailure`] if any timestamp the
    /// cycle would write is invalid. State is untouched in both cases.
    #[instrument(skip(self), fields(stop_id = %self.stop_id, entity_id = %self.entity_id))]
    pub async fn poll(&mut self) -> Result<PollOutcome, ApplicationError> {
        let payload = self.port.fetch_departures(&self.stop_id).await?;
        let prepared = self.prepare(&payload)?;

        let outcome = PollOutcome {
            departures: payload.departures.len(),
            summary_matched: prepared.summary.is_known(),
            slots_updated: prepared.slot_times.len(),
        };
        self.commit(payload, prepared);

        debug!(
            departures = outcome.departures,
            slots_updated = outcome.slots_updated,
            state = %self.state,
            "Stop polled"
        );
        Ok(outcome)
    }

    fn prepare(&self, payload: &DeparturesPayload) -> Result<PreparedCycle, ApplicationError> {
        let summary: SensorState = select_next_departure(&payload.departures, self.line_filter.as_ref())
            .map(|next| parse_local_timestamp(&next.registered_departure_time, self.timezone))
            .transpose()?
            .into();

        let slot_times = payload
            .departures
            .iter()
            .take(self.slots.len())
            .map(|record| parse_local_timestamp(&record.registered_departure_time, self.timezone))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PreparedCycle {
            summary,
            slot_times,
        })
    }

    fn commit(&mut self, payload: DeparturesPayload, prepared: PreparedCycle) {
        self.state = prepared.summary;

        for ((slot, record), departs_at) in self
            .slots
            .iter_mut()
            .zip(payload.departures.iter())
            .zip(prepared.slot_times)
        {
            slot.commit(record.clone(), departs_at);
        }

        self.payload = Some(payload);
        (self.publish)(&self.snapshot());
    }

    /// Host entity id of the summary entity
    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    /// Polled stop
    pub const fn stop_id(&self) -> &StopId {
        &self.stop_id
    }

    /// Display name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Active line filter
    pub const fn line_filter(&self) -> Option<&LineFilter> {
        self.line_filter.as_ref()
    }

    /// Zone used to localize departure times
    pub const fn timezone(&self) -> Timezone {
        self.timezone
    }

    /// Summary state
    pub const fn state(&self) -> SensorState {
        self.state
    }

    /// Last successfully fetched payload
    pub const fn payload(&self) -> Option<&DeparturesPayload> {
        self.payload.as_ref()
    }

    /// Departure slots, empty when disabled
    pub fn slots(&self) -> &[DepartureSlot] {
        &self.slots
    }

    /// Snapshots of the monitor followed by its slots
    pub fn snapshots(&self) -> Vec<EntitySnapshot> {
        std::iter::once(self.snapshot())
            .chain(self.slots.iter().map(DepartureSlot::snapshot))
            .collect()
    }

    /// Current snapshot of the summary entity
    pub fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot {
            entity_id: self.entity_id.clone(),
            name: self.name.clone(),
            icon: STOP_ICON,
            device_class: DEVICE_CLASS_TIMESTAMP,
            state: self.state,
            attributes: self
                .payload
                .as_ref()
                .map_or_else(Map::new, DeparturesPayload::to_attributes),
            should_poll: true,
            attribution: ATTRIBUTION,
        }
    }
}
