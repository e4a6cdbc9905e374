//! Application services (use cases)

mod departure_slot;
mod stop_monitor;

pub use departure_slot::DepartureSlot;
pub use stop_monitor::{
    DEPARTURE_SLOT_COUNT, PollOutcome, StopMonitor, StopMonitorConfig, select_next_departure,
};
