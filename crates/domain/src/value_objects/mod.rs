//! Value Objects - Immutable, identity-less domain primitives

mod line_filter;
mod line_id;
mod sensor_state;
mod stop_id;
mod timezone;

pub use line_filter::LineFilter;
pub use line_id::LineId;
pub use sensor_state::{STATE_UNKNOWN, SensorState};
pub use stop_id::StopId;
pub use timezone::Timezone;
