//! Sensor state value object

use std::fmt;

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Serialize, Serializer};

/// Literal state reported while no value is known
pub const STATE_UNKNOWN: &str = "unknown";

/// State of a timestamp entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SensorState {
    /// No value yet, or nothing matched
    #[default]
    Unknown,
    /// A zone-aware departure instant
    Timestamp(DateTime<FixedOffset>),
}

impl SensorState {
    /// Whether a value is present
    #[must_use]
    pub const fn is_known(&self) -> bool {
        matches!(self, Self::Timestamp(_))
    }

    /// The timestamp, if known
    #[must_use]
    pub const fn timestamp(&self) -> Option<DateTime<FixedOffset>> {
        match self {
            Self::Unknown => None,
            Self::Timestamp(ts) => Some(*ts),
        }
    }
}

impl From<Option<DateTime<FixedOffset>>> for SensorState {
    fn from(value: Option<DateTime<FixedOffset>>) -> Self {
        value.map_or(Self::Unknown, Self::Timestamp)
    }
}

impl fmt::Display for SensorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => f.write_str(STATE_UNKNOWN),
            Self::Timestamp(ts) => f.write_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, false)),
        }
    }
}

impl Serialize for SensorState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_displays_sentinel() {
        assert_eq!(SensorState::Unknown.to_string(), "unknown");
        assert!(!SensorState::default().is_known());
    }

    #[test]
    fn timestamp_displays_iso_with_offset() {
        let ts = DateTime::parse_from_rfc3339("2021-03-01T08:15:00+01:00").unwrap();
        let state = SensorState::Timestamp(ts);
        assert_eq!(state.to_string(), "2021-03-01T08:15:00+01:00");
        assert!(state.is_known());
    }

    #[test]
    fn fractional_seconds_are_kept() {
        let ts = DateTime::parse_from_rfc3339("2021-03-01T08:15:00.250+01:00").unwrap();
        assert_eq!(
            SensorState::Timestamp(ts).to_string(),
            "2021-03-01T08:15:00.250+01:00"
        );
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&SensorState::Unknown).unwrap();
        assert_eq!(json, "\"unknown\"");
    }
}
